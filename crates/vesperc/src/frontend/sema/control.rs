//! Structural control-flow checks over function bodies
//!
//! Both walks are purely syntactic. They match on every [`StmtKind`], so a
//! new statement kind cannot slip through either of them unhandled.

use crate::frontend::ast::{Block, Stmt, StmtKind};

/// Whether executing `block` is guaranteed to reach a `return`.
///
/// A return counts when it appears directly in the block, inside a nested
/// block, or on both arms of an `if`. Loop bodies never count, since the
/// body may run zero times.
pub fn guarantees_return(block: &Block) -> bool {
    block.stmts.iter().any(stmt_guarantees_return)
}

fn stmt_guarantees_return(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::Block(inner) => guarantees_return(inner),
        StmtKind::If {
            then_branch,
            else_branch,
            ..
        } => guarantees_return(then_branch) && guarantees_return(else_branch),
        StmtKind::While { .. }
        | StmtKind::For { .. }
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Expr(_) => false,
    }
}

/// A `break` or `continue` found outside of any loop body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Break { line: usize },
    Continue { line: usize },
}

/// Collect `break`/`continue` statements that are not inside a loop.
///
/// The walk descends into nested blocks and both arms of `if`, and stops
/// at `while`/`for`: anything below a loop is accepted without being
/// visited.
pub fn misplaced_jumps(block: &Block) -> Vec<Jump> {
    let mut jumps = Vec::new();
    collect_jumps(block, &mut jumps);
    jumps
}

fn collect_jumps(block: &Block, jumps: &mut Vec<Jump>) {
    for stmt in &block.stmts {
        match &stmt.kind {
            // Loops and leaves cannot hold a misplaced jump at this level
            StmtKind::While { .. }
            | StmtKind::For { .. }
            | StmtKind::Return(_)
            | StmtKind::Expr(_) => {}
            StmtKind::Block(inner) => collect_jumps(inner, jumps),
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                collect_jumps(then_branch, jumps);
                collect_jumps(else_branch, jumps);
            }
            StmtKind::Break => jumps.push(Jump::Break { line: stmt.line }),
            StmtKind::Continue => jumps.push(Jump::Continue { line: stmt.line }),
        }
    }
}
