//! Hotness formulas. Scores are only comparable within one entity type and
//! carry no upper bound; views clamp for display with [`display_percent`].

/// Skaters rank on raw points per game over the window.
pub fn skater_hotness(recent_points_per_game: f64) -> f64 {
    recent_points_per_game
}

/// 50% save percentage, 30% inverted GAA (0 at 5.00 or worse), 20% win rate.
pub fn goalie_hotness(save_pct: f64, gaa: f64, win_pct: f64) -> f64 {
    let gaa_score = (1.0 - gaa / 5.0).max(0.0);
    save_pct * 0.5 + gaa_score * 0.3 + win_pct * 0.2
}

/// 60% win rate, 40% goal differential per game rescaled from [-3, +3] to
/// [0, 1]. Differentials beyond ±3 are not clamped.
pub fn team_hotness(win_pct: f64, gd_per_game: f64) -> f64 {
    win_pct * 0.6 + (gd_per_game + 3.0) / 6.0 * 0.4
}

/// Score as a whole percentage clamped to 0..=100, for gauges and bars.
pub fn display_percent(score: f64) -> u16 {
    if score.is_nan() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn skater_score_is_points_per_game() {
        assert_eq!(skater_hotness(1.4), 1.4);
    }

    #[test]
    fn goalie_bounds() {
        assert!(close(goalie_hotness(1.0, 0.0, 1.0), 1.0));
        assert!(close(goalie_hotness(0.0, 5.0, 0.0), 0.0));
        assert!(close(goalie_hotness(0.0, 9.0, 0.0), 0.0));
    }

    #[test]
    fn goalie_monotonicity() {
        let base = goalie_hotness(0.9, 2.5, 0.5);
        assert!(goalie_hotness(0.92, 2.5, 0.5) > base);
        assert!(goalie_hotness(0.9, 2.5, 0.6) > base);
        assert!(goalie_hotness(0.9, 2.0, 0.5) > base);
        assert!(goalie_hotness(0.9, 3.0, 0.5) < base);
    }

    #[test]
    fn team_reference_points() {
        assert!(close(team_hotness(1.0, 3.0), 1.0));
        assert!(close(team_hotness(0.0, -3.0), 0.0));
        assert!(close(team_hotness(0.5, 0.0), 0.5));
        assert!(close(team_hotness(0.7, 1.2), 0.70));
    }

    #[test]
    fn team_goal_diff_is_not_clamped() {
        assert!(team_hotness(1.0, 4.5) > 1.0);
        assert!(team_hotness(0.0, -4.5) < 0.0);
    }

    #[test]
    fn display_percent_clamps() {
        assert_eq!(display_percent(0.704), 70);
        assert_eq!(display_percent(1.3), 100);
        assert_eq!(display_percent(-0.2), 0);
        assert_eq!(display_percent(f64::NAN), 0);
    }
}
