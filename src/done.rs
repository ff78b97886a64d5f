//! The outcome of a non-`SELECT` statement (§3 "ResultSet" sibling, §4.5 OK
//! handling): rows affected, the last auto-increment id, and (for a batch)
//! a per-statement breakdown.

/// The result of `executeUpdate`/`execute` for a statement that produced no
/// rows, or the accumulated result of a batch (§4.10 `Statement`).
#[derive(Debug, Clone, Default)]
pub struct MySqlQueryResult {
    rows_affected: u64,
    last_insert_id: u64,
}

impl MySqlQueryResult {
    pub(crate) fn new(rows_affected: u64, last_insert_id: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id,
        }
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }
}

impl Extend<MySqlQueryResult> for MySqlQueryResult {
    /// Accumulates a batch's individual results (§4.10): affected-row counts
    /// sum, and the last non-zero insert id wins, matching `addBatch`'s
    /// running totals.
    fn extend<T: IntoIterator<Item = MySqlQueryResult>>(&mut self, iter: T) {
        for result in iter {
            self.rows_affected += result.rows_affected;
            if result.last_insert_id != 0 {
                self.last_insert_id = result.last_insert_id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_sums_rows_and_keeps_latest_insert_id() {
        let mut total = MySqlQueryResult::default();
        total.extend([MySqlQueryResult::new(1, 10), MySqlQueryResult::new(2, 11)]);
        assert_eq!(total.rows_affected(), 3);
        assert_eq!(total.last_insert_id(), 11);
    }
}
