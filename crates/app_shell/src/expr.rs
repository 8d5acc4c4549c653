//! Command expression composition

/// Compose a shell command from an expression.
///
/// Every `%` is replaced with all `paths`, each shell-quoted and separated by
/// a space. `%%` produces a literal `%`.
///
/// Returns `None` if the expression is blank or a path cannot be quoted.
pub fn compose(expr: &str, paths: &[&str]) -> Option<String> {
    if expr.trim().is_empty() {
        return None;
    }

    let mut cmd = String::with_capacity(expr.len());
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            cmd.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            cmd.push('%');
            continue;
        }

        for (i, path) in paths.iter().enumerate() {
            if i > 0 {
                cmd.push(' ');
            }
            match shlex::try_quote(path) {
                Ok(quoted) => cmd.push_str(&quoted),
                Err(e) => {
                    tracing::warn!("Cannot quote path {:?}: {}", path, e);
                    return None;
                }
            }
        }
    }

    Some(cmd)
}
