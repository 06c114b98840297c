// ABOUTME: Diagnostic AST printer — renders expressions as parenthesized prefix notation

use crate::ast::Expr;

/// Renders an expression for diagnostics, never on the normal execution
/// path. `(op child ...)` for Binary/Unary/Logical, `(group child)` for
/// Grouping, the stringified value for Literal, and the bare name for
/// Variable/Assign.
pub fn print(expr: &Expr) -> String {
    match expr {
        Expr::Binary { left, operator, right } => parenthesize(&operator.lexeme, &[left, right]),
        Expr::Logical { left, operator, right } => parenthesize(&operator.lexeme, &[left, right]),
        Expr::Unary { operator, right } => parenthesize(&operator.lexeme, &[right]),
        Expr::Grouping { expression } => parenthesize("group", &[expression]),
        Expr::Literal { value } => value.to_string(),
        Expr::Variable { name } => name.lexeme.clone(),
        Expr::Assign { name, value } => parenthesize(&format!("= {}", name.lexeme), &[value]),
        Expr::Call { callee, arguments, .. } => {
            let mut parts: Vec<&Expr> = vec![callee];
            parts.extend(arguments.iter());
            parenthesize("call", &parts)
        }
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = format!("({name}");
    for expr in exprs {
        out.push(' ');
        out.push_str(&print(expr));
    }
    out.push(')');
    out
}
