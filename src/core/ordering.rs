//! Manual sort-order maintenance shared by every ordered collection.
//!
//! A reorder assigns `sort_order = index` to each id in the given sequence.
//! Ids that are not listed keep their position and unknown ids match no row.
//! Reorders are last-writer-wins: two admins reordering the same collection at
//! the same time race, and whichever commits last decides the final order.

use crate::errors::{Error, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::trace;

/// Writes `sort_order = index` for each id of `ordered_ids`, restricted to rows
/// matching `scope` when one is given. Returns the number of rows updated.
pub(crate) async fn apply_manual_order<C, E>(
    db: &C,
    ordered_ids: &[i32],
    id_column: E::Column,
    sort_column: E::Column,
    scope: Option<Condition>,
) -> Result<u64>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut updated = 0;
    for (index, id) in ordered_ids.iter().enumerate() {
        let position = i32::try_from(index)
            .map_err(|_| Error::validation("Too many ids in reorder request"))?;

        let mut update = E::update_many()
            .col_expr(sort_column, Expr::value(position))
            .filter(id_column.eq(*id));
        if let Some(scope) = &scope {
            update = update.filter(scope.clone());
        }

        let result = update.exec(db).await?;
        trace!(id, position, rows = result.rows_affected, "Applied sort order");
        updated += result.rows_affected;
    }
    Ok(updated)
}
