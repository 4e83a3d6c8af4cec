//! Release-independent fixups applied to an app descriptor on every run
//!
//! All repairs are plain string replacements and are idempotent.

use tracing::debug;

use crate::types::AppDescriptor;

/// Rewrite a raw GitHub URL that points through a branch ref.
///
/// `https://raw.githubusercontent.com/u/r/refs/heads/main/icon.png`
/// becomes `https://raw.githubusercontent.com/u/r/main/icon.png`.
pub fn fix_raw_github_url(url: &str) -> String {
    url.replace("/refs/heads/", "/")
}

/// Turn `/n` (slash typed instead of backslash) into a real newline.
///
/// Backslash sequences are left alone.
pub fn fix_description_escapes(text: &str) -> String {
    text.replace("/n", "\n")
}

/// Apply URL repairs and, when `fix_descriptions` is set, description repairs.
///
/// Only `iconURL`, `headerURL`, screenshot URLs and `localizedDescription`
/// are touched. Returns `true` when any of them changed.
pub fn repair_descriptor(app: &mut AppDescriptor, fix_descriptions: bool) -> bool {
    let mut changed = false;

    for key in ["iconURL", "headerURL"] {
        if let Some(url) = app.str_field_mut(key) {
            changed |= replace_if_changed(url, fix_raw_github_url);
        }
    }

    app.for_each_screenshot_url_mut(|url| {
        changed |= replace_if_changed(url, fix_raw_github_url);
    });

    if fix_descriptions {
        if let Some(description) = app.str_field_mut("localizedDescription") {
            changed |= replace_if_changed(description, fix_description_escapes);
        }
    }

    if changed {
        debug!("Repaired descriptor fields");
    }
    changed
}

fn replace_if_changed(value: &mut String, fix: impl Fn(&str) -> String) -> bool {
    let fixed = fix(value.as_str());
    if fixed == *value {
        return false;
    }
    *value = fixed;
    true
}
