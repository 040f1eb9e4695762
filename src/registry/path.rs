/*!
 * Registry Paths
 * Canonical key identities: unified separators, cleaned, lower-cased
 */

use std::path::{Path, PathBuf};

/// Root of the machine hive (`HKEY_LOCAL_MACHINE`)
pub const MACHINE_HIVE: &str = "/registry/machine";
/// Root of the users hive (`HKEY_USERS`)
pub const USER_HIVE: &str = "/registry/user";
/// Profile that `HKEY_CURRENT_USER` resolves to
pub const DEFAULT_USER: &str = "/registry/user/.default";

/// Win32 root-key spellings accepted as the first path segment
const ALIASES: &[(&str, &str)] = &[
    ("hkey_local_machine", MACHINE_HIVE),
    ("hklm", MACHINE_HIVE),
    ("hkey_users", USER_HIVE),
    ("hku", USER_HIVE),
    ("hkey_current_user", DEFAULT_USER),
    ("hkcu", DEFAULT_USER),
];

/// Canonical identity of a seeded registry path
///
/// `\` and `/` are interchangeable, `.` and `..` segments and repeated
/// separators collapse, trailing separators are dropped and the result is
/// lower-cased and absolute. Win32 root aliases (`HKLM`, `HKCU`, ...) expand
/// to their `\Registry` form. Only seeding goes through here; guest names
/// use [`normalize`].
pub fn canonicalize(raw: impl AsRef<Path>) -> PathBuf {
    let unified = raw.as_ref().to_string_lossy().replace('\\', "/").to_lowercase();
    let trimmed = unified.trim_start_matches('/');

    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (trimmed, ""),
    };
    let expanded = match ALIASES.iter().find(|(alias, _)| *alias == first) {
        Some((_, root)) => format!("{root}/{rest}"),
        None => format!("/{trimmed}"),
    };

    let cleaned = path_clean::clean(&expanded);
    PathBuf::from(cleaned)
}

/// Identity of a name from the NT object namespace
///
/// Separators unify, empty and `.` segments drop and case folds. There are
/// no root aliases here, and `..` is an ordinary segment name, so it never
/// resolves to an ancestor.
pub fn normalize(raw: &str) -> PathBuf {
    let mut normalized = PathBuf::from("/");
    push_segments(&mut normalized, raw);
    normalized
}

/// Nest `relative` under the canonical `base` one segment at a time
///
/// Leading separators on `relative` are ignored so an absolute-looking
/// name still nests under `base`. The result always starts with `base`.
pub fn join(base: &Path, relative: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    push_segments(&mut joined, relative);
    joined
}

fn push_segments(path: &mut PathBuf, raw: &str) {
    raw.split(['\\', '/'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .for_each(|segment| path.push(segment.to_lowercase()));
}

/// Split a canonical path at the longest matching hive root
///
/// Returns `(hive, path-under-hive)`, or `None` when no hive contains it.
pub fn split_hive<'a>(
    canonical: &Path,
    hives: impl IntoIterator<Item = &'a PathBuf>,
) -> Option<(PathBuf, PathBuf)> {
    hives
        .into_iter()
        .filter(|hive| canonical.starts_with(hive))
        .max_by_key(|hive| hive.components().count())
        .and_then(|hive| {
            let rest = canonical.strip_prefix(hive).ok()?;
            Some((hive.clone(), rest.to_path_buf()))
        })
}

/// NT spelling of a path: backslash separated, trailing separators stripped, upper-cased
pub fn nt_name(path: &Path) -> String {
    let text = path.to_string_lossy().replace('/', "\\");
    text.trim_end_matches(['\\', '/']).to_uppercase()
}
