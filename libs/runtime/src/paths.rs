use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the server home directory.
///
/// - `None` or empty → `$HOME/<default_subdir>` (platform home).
/// - A leading `~` is expanded against the platform home.
/// - Relative paths are absolutized against the current directory.
///
/// When `create` is set, the resolved directory is created.
pub fn resolve_home_dir(
    requested: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match requested {
        Some(raw) if !raw.trim().is_empty() => expand_tilde(raw.trim())?,
        _ => platform_home()?.join(default_subdir),
    };

    let absolute = if resolved.is_relative() {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(resolved)
    } else {
        resolved
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("Failed to create home dir '{}'", absolute.display()))?;
    }

    Ok(absolute)
}

fn platform_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine platform home directory"))
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/") {
        return Ok(platform_home()?.join(rest));
    }
    if raw == "~" {
        return platform_home();
    }
    Ok(PathBuf::from(raw))
}

/// Resolve a path against `base_dir` unless it is already absolute.
pub fn resolve_against(path: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_uses_platform_default() {
        let resolved = resolve_home_dir(Some("   ".to_string()), ".webtime_test", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".webtime_test"));
    }

    #[test]
    fn tilde_is_expanded() {
        let resolved = resolve_home_dir(Some("~/.webtime_test".to_string()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(!resolved.to_string_lossy().contains('~'));
    }

    #[test]
    fn relative_paths_are_absolutized() {
        let resolved = resolve_home_dir(Some("some/rel".to_string()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel"));
    }

    #[test]
    fn resolve_against_keeps_absolute() {
        let base = Path::new("/base");
        assert_eq!(resolve_against("/abs/log", base), PathBuf::from("/abs/log"));
        assert_eq!(
            resolve_against("logs/app.log", base),
            PathBuf::from("/base/logs/app.log")
        );
    }
}
