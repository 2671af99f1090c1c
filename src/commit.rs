//! Batch commit protocol.
//!
//! Turns a set of per-tile target corner heights into validated host
//! mutations. Every tile is queried before anything executes, so a
//! permission or funds failure can abort the whole batch without touching
//! terrain; individual rejections only drop their own tile.

use log::{debug, warn};
use thiserror::Error;

use crate::encoding::encode_surface;
use crate::heightmap::CornerHeights;
use crate::host::{ActionStatus, TerrainHost};
use crate::selection::TileCoord;

/// Why a batch was not (fully) applied. Recovered at the batch boundary;
/// a failed apply leaves the terrain unchanged for that tick.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("this player group is not allowed to modify the land")]
    PermissionDenied,
    /// Every tile in the batch was rejected; carries the last rejection's
    /// user-facing message.
    #[error("{0}")]
    Rejected(String),
    #[error("not enough cash: {required} required, {available} available")]
    InsufficientFunds { required: i64, available: i64 },
}

/// What a successful batch did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Tiles that were actually mutated, in batch order.
    pub executed: Vec<TileCoord>,
    pub cost: i64,
}

/// Validate and apply a batch of target corner heights.
///
/// Protocol: empty batches succeed trivially; a network client without
/// terraform permission aborts everything; each tile is encoded and
/// queried in order, accumulating cost; if nothing validated the last
/// rejection is reported; if the total cost exceeds available cash (and
/// free money is off) nothing executes; otherwise every validated tile is
/// executed and rejected tiles are silently skipped.
pub fn commit_batch<H: TerrainHost>(
    host: &mut H,
    targets: &[(TileCoord, CornerHeights)],
    up: bool,
) -> Result<CommitOutcome, CommitError> {
    if targets.is_empty() {
        return Ok(CommitOutcome::default());
    }

    if host.is_network_client() && !host.has_terraform_permission() {
        warn!("terraform batch rejected: missing permission");
        return Err(CommitError::PermissionDenied);
    }

    // Query phase: every tile's outcome is known before anything executes.
    let mut pending = Vec::with_capacity(targets.len());
    let mut cost = 0i64;
    let mut last_error: Option<String> = None;
    for &(tile, target) in targets {
        let mutation = encode_surface(tile, target, up);
        let result = host.query_set_height(&mutation);
        match result.status {
            ActionStatus::Ok | ActionStatus::NoOp => {
                cost += result.cost;
                pending.push((tile, mutation));
            }
            ActionStatus::Err(message) => last_error = Some(message),
        }
    }

    if pending.is_empty() {
        let message = last_error.unwrap_or_default();
        warn!("terraform batch rejected: {message}");
        return Err(CommitError::Rejected(message));
    }

    if !host.free_money() && cost > host.cash() {
        return Err(CommitError::InsufficientFunds {
            required: cost,
            available: host.cash(),
        });
    }

    // Execute phase: only tiles whose query succeeded, same arguments.
    let mut executed = Vec::with_capacity(pending.len());
    for (tile, mutation) in pending {
        host.execute_set_height(&mutation);
        executed.push(tile);
    }
    debug!(
        "committed {}/{} tiles, cost {}",
        executed.len(),
        targets.len(),
        cost
    );
    Ok(CommitOutcome { executed, cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;

    fn batch(tiles: &[(i32, i32)]) -> Vec<(TileCoord, CornerHeights)> {
        tiles
            .iter()
            .map(|&(x, y)| (TileCoord::new(x, y), CornerHeights::splat(7.0)))
            .collect()
    }

    #[test]
    fn test_empty_batch_is_trivial_success() {
        let mut host = MockHost::flat(10, 10);
        let outcome = commit_batch(&mut host, &[], true).unwrap();
        assert!(outcome.executed.is_empty());
        assert_eq!(outcome.cost, 0);
        assert!(host.queries.is_empty());
        assert!(host.executes.is_empty());
    }

    #[test]
    fn test_client_without_permission_aborts() {
        let mut host = MockHost::flat(10, 10);
        host.network_client = true;
        host.permission = false;

        let err = commit_batch(&mut host, &batch(&[(2, 2), (3, 3)]), true).unwrap_err();
        assert_eq!(err, CommitError::PermissionDenied);
        assert!(host.queries.is_empty());
        assert!(host.executes.is_empty());
    }

    #[test]
    fn test_permission_only_checked_for_clients() {
        let mut host = MockHost::flat(10, 10);
        host.network_client = false;
        host.permission = false;

        assert!(commit_batch(&mut host, &batch(&[(2, 2)]), true).is_ok());
        assert_eq!(host.executes.len(), 1);
    }

    #[test]
    fn test_all_rejected_reports_last_error_no_executes() {
        let mut host = MockHost::flat(10, 10);
        host.reject_all = Some("land not for sale".into());

        let err = commit_batch(&mut host, &batch(&[(2, 2), (3, 3), (4, 4)]), true).unwrap_err();
        assert_eq!(err, CommitError::Rejected("land not for sale".into()));
        assert_eq!(host.queries.len(), 3);
        assert!(host.executes.is_empty());
    }

    #[test]
    fn test_partial_rejection_skips_tile() {
        let mut host = MockHost::flat(10, 10);
        host.reject_tiles = vec![(3, 3)];

        let outcome = commit_batch(&mut host, &batch(&[(2, 2), (3, 3), (4, 4)]), true).unwrap();
        assert_eq!(
            outcome.executed,
            vec![TileCoord::new(2, 2), TileCoord::new(4, 4)]
        );
        assert_eq!(host.executes.len(), 2);
    }

    #[test]
    fn test_insufficient_funds_aborts_after_validation() {
        let mut host = MockHost::flat(10, 10);
        host.tile_cost = 600;
        host.cash = 1000;

        // Both tiles validate, but the summed cost exceeds the cash.
        let err = commit_batch(&mut host, &batch(&[(2, 2), (3, 3)]), true).unwrap_err();
        assert_eq!(
            err,
            CommitError::InsufficientFunds {
                required: 1200,
                available: 1000
            }
        );
        assert_eq!(host.queries.len(), 2);
        assert!(host.executes.is_empty());
    }

    #[test]
    fn test_free_money_ignores_cost() {
        let mut host = MockHost::flat(10, 10);
        host.tile_cost = 600;
        host.cash = 0;
        host.free_money = true;

        let outcome = commit_batch(&mut host, &batch(&[(2, 2), (3, 3)]), true).unwrap();
        assert_eq!(outcome.cost, 1200);
        assert_eq!(host.executes.len(), 2);
    }

    #[test]
    fn test_queries_precede_executes() {
        let mut host = MockHost::flat(10, 10);
        host.tile_cost = 1;

        commit_batch(&mut host, &batch(&[(2, 2), (3, 3)]), true).unwrap();
        // All queries happen before any execute, in batch order.
        assert_eq!(host.queries.len(), 2);
        assert_eq!(host.executes.len(), 2);
        assert_eq!(host.queries[0].x, 2);
        assert_eq!(host.queries[1].x, 3);
        assert_eq!(host.executes, host.queries);
    }
}
