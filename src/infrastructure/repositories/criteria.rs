//! Filter conditions accepted by the generic repository

use sea_orm::Condition;
use sea_orm::sea_query::SimpleExpr;

use crate::domain::DomainError;

/// How the predicates of a sequence are joined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

/// A single predicate or an ordered sequence of predicates.
#[derive(Debug, Clone)]
pub enum Criteria {
    Single(SimpleExpr),
    Sequence(Vec<SimpleExpr>),
}

impl Criteria {
    /// Build the SQL condition. An empty sequence has nothing to join and is
    /// rejected as a caller error.
    pub fn into_condition(self, operator: LogicalOperator) -> Result<Condition, DomainError> {
        match self {
            Criteria::Single(expr) => Ok(Condition::all().add(expr)),
            Criteria::Sequence(exprs) if exprs.is_empty() => {
                Err(DomainError::LogicalOperatorMustBeGiven)
            }
            Criteria::Sequence(exprs) => {
                let base = match operator {
                    LogicalOperator::And => Condition::all(),
                    LogicalOperator::Or => Condition::any(),
                };
                Ok(exprs.into_iter().fold(base, |cond, expr| cond.add(expr)))
            }
        }
    }
}

impl From<SimpleExpr> for Criteria {
    fn from(expr: SimpleExpr) -> Self {
        Criteria::Single(expr)
    }
}

impl From<Vec<SimpleExpr>> for Criteria {
    fn from(exprs: Vec<SimpleExpr>) -> Self {
        Criteria::Sequence(exprs)
    }
}

impl<const N: usize> From<[SimpleExpr; N]> for Criteria {
    fn from(exprs: [SimpleExpr; N]) -> Self {
        Criteria::Sequence(exprs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book;
    use sea_orm::{ColumnTrait, DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn sql(condition: Condition) -> String {
        book::Entity::find()
            .filter(condition)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let result = Criteria::from(Vec::<SimpleExpr>::new()).into_condition(LogicalOperator::Or);
        assert!(matches!(result, Err(DomainError::LogicalOperatorMustBeGiven)));
    }

    #[test]
    fn single_predicate_ignores_operator() {
        let condition = Criteria::from(book::Column::Name.eq("Dune"))
            .into_condition(LogicalOperator::Or)
            .unwrap();
        let statement = sql(condition);
        assert!(statement.contains("'Dune'"));
        assert!(!statement.contains(" OR "));
    }

    #[test]
    fn sequence_joins_with_requested_operator() {
        let any = Criteria::from([
            book::Column::Name.eq("Dune"),
            book::Column::Author.eq("Herbert"),
        ])
        .into_condition(LogicalOperator::Or)
        .unwrap();
        assert!(sql(any).contains(" OR "));

        let all = Criteria::from([
            book::Column::Name.eq("Dune"),
            book::Column::Author.eq("Herbert"),
        ])
        .into_condition(LogicalOperator::default())
        .unwrap();
        let statement = sql(all);
        assert!(statement.contains(" AND "));
        assert!(!statement.contains(" OR "));
    }
}
