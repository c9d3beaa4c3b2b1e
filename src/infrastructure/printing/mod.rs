//! Printer discovery and receipt dispatch through the system spooler.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::{default_printer, list_printers, print_file};
#[cfg(windows)]
pub use windows::{default_printer, list_printers, print_file};

/// Name fragments that mark a receipt-capable printer.
pub const PREFERRED_KEYWORDS: &[&str] = &["pos", "58", "receipt", "thermal", "小票", "热敏"];

/// Picks the destination a receipt should go to: the first name carrying
/// a thermal keyword, then the system default, then the first listed.
pub fn pick_preferred<'a>(printers: &'a [String], default: Option<&str>) -> Option<&'a str> {
    for name in printers {
        let lower = name.to_lowercase();
        if PREFERRED_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return Some(name.as_str());
        }
    }

    if let Some(default) = default {
        if let Some(found) = printers.iter().find(|name| name.as_str() == default) {
            return Some(found.as_str());
        }
    }

    printers.first().map(|name| name.as_str())
}

/// Resolves the dispatch destination when the user named none.
/// Returns None when no printer can be found; `lp` then decides.
pub fn resolve_printer() -> Option<String> {
    match list_printers() {
        Ok(printers) if !printers.is_empty() => {
            let default = default_printer();
            pick_preferred(&printers, default.as_deref()).map(str::to_string)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Failed to list printers: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_prefers_thermal_keywords() {
        let printers = names(&["Office-Laser", "POS-58 Printer", "Kitchen"]);
        assert_eq!(
            pick_preferred(&printers, Some("Office-Laser")),
            Some("POS-58 Printer")
        );
    }

    #[test]
    fn test_pick_matches_cjk_keywords() {
        let printers = names(&["Office-Laser", "热敏打印机"]);
        assert_eq!(pick_preferred(&printers, None), Some("热敏打印机"));
    }

    #[test]
    fn test_pick_keyword_match_is_case_insensitive() {
        let printers = names(&["Epson RECEIPT-II"]);
        assert_eq!(pick_preferred(&printers, None), Some("Epson RECEIPT-II"));
    }

    #[test]
    fn test_pick_falls_back_to_default_then_first() {
        let printers = names(&["Office-Laser", "Kitchen"]);
        assert_eq!(
            pick_preferred(&printers, Some("Kitchen")),
            Some("Kitchen")
        );
        assert_eq!(pick_preferred(&printers, None), Some("Office-Laser"));
        assert_eq!(
            pick_preferred(&printers, Some("Not-Listed")),
            Some("Office-Laser")
        );
    }

    #[test]
    fn test_pick_empty_list() {
        assert_eq!(pick_preferred(&[], None), None);
    }
}
