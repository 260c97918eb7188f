// shop-backend/src/repository/query_expr.rs

//! リポジトリ共通の SQL 式ヘルパー

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

const LIKE_ESCAPE: char = '\\';

/// LIKE のメタ文字（`%` `_` とエスケープ文字自身）をエスケープする
pub(crate) fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// 大文字小文字を無視した部分一致。入力中の `%` や `_` は文字として扱う
pub(crate) fn ilike_contains<C>(column: C, needle: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// 大文字小文字を無視した完全一致
pub(crate) fn ieq<C>(column: C, value: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    Expr::expr(Func::lower(Expr::col(column))).eq(value.trim().to_lowercase())
}

/// 条件に一致する行を 1、それ以外を 0 として合計する式
pub(crate) fn sum_when(condition: SimpleExpr) -> SimpleExpr {
    SimpleExpr::from(Func::sum(Expr::case(condition, 1).finally(0)))
}

// SUM は対象行が無いと NULL になる
pub(crate) fn count_of(value: Option<i64>) -> u64 {
    value.map_or(0, |v| v.max(0) as u64)
}
