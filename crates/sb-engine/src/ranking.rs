//! # Ranking Engine
//!
//! Read-only consumer of the spot table. Every query here is scoped to one
//! semester and sees only non-flagged spots; the repo applies both filters.
//!
//! Ties on equal spot counts are broken by ascending spotter id, so the
//! leaderboard order is deterministic across runs. The repo's
//! `spot_counts` contract carries that ordering.

use sb_core::{LeaderboardEntry, SpotRepo};

/// Leaderboard for the semester: ranks `1..=N` over per-spotter counts,
/// truncated to `limit` when given.
pub async fn leaderboard(
    repo: &dyn SpotRepo,
    semester: &str,
    limit: Option<usize>,
) -> anyhow::Result<Vec<LeaderboardEntry>> {
    let mut entries: Vec<LeaderboardEntry> = repo
        .spot_counts(semester)
        .await?
        .into_iter()
        .enumerate()
        .map(|(i, (user_id, count))| LeaderboardEntry { rank: i + 1, user_id, count })
        .collect();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    Ok(entries)
}

/// Number of qualifying spots `user_id` has posted this semester.
pub async fn count_for(repo: &dyn SpotRepo, user_id: &str, semester: &str) -> anyhow::Result<i64> {
    repo.count_for(user_id, semester).await
}

/// The user's leaderboard rank, by linear scan. `None` when the user has no
/// qualifying spots; the grouping only includes users with at least one.
pub async fn rank_for(
    repo: &dyn SpotRepo,
    user_id: &str,
    semester: &str,
) -> anyhow::Result<Option<usize>> {
    let board = leaderboard(repo, semester, None).await?;
    Ok(board.iter().find(|e| e.user_id == user_id).map(|e| e.rank))
}

/// The spotter who has tagged `user_id` the most this semester, with their
/// count. `None` when nobody has spotted the user yet.
pub async fn top_spotter_of(
    repo: &dyn SpotRepo,
    user_id: &str,
    semester: &str,
) -> anyhow::Result<Option<(String, i64)>> {
    let counts = repo.spotter_counts_of(user_id, semester).await?;
    Ok(counts.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{spot, InMemoryRepo};

    #[tokio::test]
    async fn two_spots_one_entry() {
        let repo = InMemoryRepo::default();
        repo.seed(spot("a", "U1", &["U2"], "fa24"));
        repo.seed(spot("b", "U1", &["U2"], "fa24"));

        let board = leaderboard(&repo, "fa24", None).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!((board[0].rank, board[0].user_id.as_str(), board[0].count), (1, "U1", 2));
    }

    #[tokio::test]
    async fn flagged_spots_do_not_contribute() {
        let repo = InMemoryRepo::default();
        repo.seed(spot("a", "U1", &["U2"], "fa24"));
        let mut b = spot("b", "U1", &["U2"], "fa24");
        b.flagged = true;
        repo.seed(b);

        let board = leaderboard(&repo, "fa24", None).await.unwrap();
        assert_eq!(board[0].count, 1);
    }

    #[tokio::test]
    async fn flagging_only_spot_removes_user_entirely() {
        let repo = InMemoryRepo::default();
        let mut a = spot("a", "U1", &["U2"], "fa24");
        a.flagged = true;
        repo.seed(a);

        assert!(leaderboard(&repo, "fa24", None).await.unwrap().is_empty());
        assert_eq!(rank_for(&repo, "U1", "fa24").await.unwrap(), None);
    }

    #[tokio::test]
    async fn ties_break_by_ascending_user_id() {
        let repo = InMemoryRepo::default();
        repo.seed(spot("a", "U2", &["U9"], "fa24"));
        repo.seed(spot("b", "U1", &["U9"], "fa24"));

        let board = leaderboard(&repo, "fa24", None).await.unwrap();
        assert_eq!(board[0].user_id, "U1");
        assert_eq!(board[1].user_id, "U2");
        assert_eq!(board[1].rank, 2);
    }

    #[tokio::test]
    async fn limit_truncates() {
        let repo = InMemoryRepo::default();
        for (id, user) in [("a", "U1"), ("b", "U2"), ("c", "U3")] {
            repo.seed(spot(id, user, &["U9"], "fa24"));
        }
        let board = leaderboard(&repo, "fa24", Some(2)).await.unwrap();
        assert_eq!(board.len(), 2);
    }

    #[tokio::test]
    async fn rank_is_none_iff_count_is_zero() {
        let repo = InMemoryRepo::default();
        repo.seed(spot("a", "U1", &["U2"], "fa24"));

        assert_eq!(count_for(&repo, "U1", "fa24").await.unwrap(), 1);
        assert_eq!(rank_for(&repo, "U1", "fa24").await.unwrap(), Some(1));
        assert_eq!(count_for(&repo, "U2", "fa24").await.unwrap(), 0);
        assert_eq!(rank_for(&repo, "U2", "fa24").await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_semesters_are_invisible() {
        let repo = InMemoryRepo::default();
        repo.seed(spot("a", "U1", &["U2"], "sp24"));

        assert!(leaderboard(&repo, "fa24", None).await.unwrap().is_empty());
        assert_eq!(top_spotter_of(&repo, "U2", "fa24").await.unwrap(), None);
    }

    #[tokio::test]
    async fn top_spotter_picks_largest_group() {
        let repo = InMemoryRepo::default();
        repo.seed(spot("a", "U1", &["U9"], "fa24"));
        repo.seed(spot("b", "U1", &["U9"], "fa24"));
        repo.seed(spot("c", "U2", &["U9"], "fa24"));

        let top = top_spotter_of(&repo, "U9", "fa24").await.unwrap();
        assert_eq!(top, Some(("U1".to_string(), 2)));
    }
}
