use battle_core::BattleSummary;

/// Receives the summary when a battle reaches Victory or Defeat.
///
/// Called exactly once per battle, from the battle worker. Implementations
/// should hand the summary off and return quickly.
pub trait ResultsHandoff: Send + Sync {
    fn on_battle_end(&self, summary: BattleSummary);
}

impl<F> ResultsHandoff for F
where
    F: Fn(BattleSummary) + Send + Sync,
{
    fn on_battle_end(&self, summary: BattleSummary) {
        self(summary)
    }
}
