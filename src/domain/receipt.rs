//! Receipt rendering and page height estimation for 58mm thermal paper.
//!
//! Receipts are plain text laid out in half-width columns. CJK characters
//! occupy two columns, so all wrapping and centering here goes through
//! display width rather than character count.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::model::Prescription;

/// Usable width of 58mm paper in half-width columns.
pub const PAPER_COLS: usize = 22;

/// Ceiling for the estimated page height (A4 length) in cm.
const MAX_PAGE_HEIGHT_CM: f64 = 29.7;

/// Characters per line assumed by the height estimate for labelled text.
const EST_CHARS_PER_TEXT_LINE: usize = 18;

/// Characters per line assumed by the height estimate for indented herb lines.
const EST_CHARS_PER_HERB_LINE: usize = 16;

/// Layout parameters for rendering and height estimation.
///
/// Font size is in points, spacing is a multiplier on the line height,
/// margins are in cm. The safety margin scales the whole estimate up so a
/// cut-off never lands mid-text on thermal printers that trim aggressively.
#[derive(Debug, Clone)]
pub struct ReceiptProfile {
    pub clinic_name: String,
    pub title: String,
    pub font_size: u32,
    pub line_spacing: f64,
    pub safety_margin: f64,
    pub margin_cm: f64,
}

/// Renders a prescription as receipt text.
///
/// Empty optional fields (diagnosis, usage, doctor, doctor phone) drop
/// their lines entirely rather than printing blank labels.
pub fn render(prescription: &Prescription, profile: &ReceiptProfile) -> String {
    let heavy = "=".repeat(PAPER_COLS);
    let light = "-".repeat(PAPER_COLS);

    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy.clone());
    if !profile.clinic_name.trim().is_empty() {
        lines.push(center(profile.clinic_name.trim(), PAPER_COLS));
    }
    if !profile.title.trim().is_empty() {
        lines.push(center(profile.title.trim(), PAPER_COLS));
    }
    lines.push(heavy.clone());

    push_wrapped(&mut lines, &format!("姓名：{}", prescription.patient_name));
    push_wrapped(
        &mut lines,
        &format!("性别：{}  年龄：{}", prescription.gender, prescription.age),
    );
    push_wrapped(&mut lines, &format!("电话：{}", prescription.phone));
    push_wrapped(
        &mut lines,
        &format!("日期：{}", minute_precision(&prescription.created_at)),
    );
    lines.push(light.clone());

    let diagnosis = prescription.diagnosis.trim();
    if !diagnosis.is_empty() {
        push_wrapped(&mut lines, &format!("中医辨证：{}", diagnosis));
    }

    lines.push(String::new());
    lines.push("处方：".to_string());
    for herb in prescription.herb_lines() {
        push_wrapped(&mut lines, &format!("  {}", herb));
    }
    lines.push(String::new());

    let usage = prescription.usage.trim();
    if !usage.is_empty() {
        push_wrapped(&mut lines, &format!("用法：{}", usage));
    }
    lines.push(light);

    let doctor = prescription.doctor.trim();
    if !doctor.is_empty() {
        push_wrapped(&mut lines, &format!("开方医生：{}", doctor));
    }
    let doctor_phone = prescription.doctor_phone.trim();
    if !doctor_phone.is_empty() {
        push_wrapped(&mut lines, &format!("联系电话：{}", doctor_phone));
    }
    lines.push(heavy);

    lines.join("\n")
}

/// Estimates the printed page height in cm for single-page thermal output.
///
/// Line counts are approximated from character counts, then the whole
/// figure is scaled by the safety margin and capped at A4 length.
pub fn estimate_height_cm(prescription: &Prescription, profile: &ReceiptProfile) -> f64 {
    // Point size to cm, scaled by line spacing
    let base = (profile.font_size as f64 / 72.0) * 2.54 * profile.line_spacing;

    let mut height = profile.margin_cm;

    // Header block: clinic line, title line, separator
    height += base * 1.2;
    height += base * 1.0;
    height += base * 0.6;

    // Patient info block and separator
    height += base * 4.0;
    height += base * 0.6;

    let diagnosis = prescription.diagnosis.trim();
    if !diagnosis.is_empty() {
        height += base * est_lines(diagnosis, EST_CHARS_PER_TEXT_LINE);
    }

    // 处方 label
    height += base;
    for herb in prescription.herb_lines() {
        height += base * est_lines(herb, EST_CHARS_PER_HERB_LINE);
    }

    let usage = prescription.usage.trim();
    if !usage.is_empty() {
        height += base * est_lines(usage, EST_CHARS_PER_TEXT_LINE);
    }

    height += base * 0.6;
    if !prescription.doctor.trim().is_empty() {
        height += base;
    }
    if !prescription.doctor_phone.trim().is_empty() {
        height += base;
    }
    height += base * 0.6;

    height += profile.margin_cm;
    height *= profile.safety_margin;
    height.min(MAX_PAGE_HEIGHT_CM)
}

/// Wraps text into lines of at most `width` display columns.
///
/// Breaks are taken mid-word; herb names and phone numbers carry no
/// useful word boundaries, so greedy column-filling matches how the
/// paper is actually used.
pub fn wrap_display(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn push_wrapped(lines: &mut Vec<String>, text: &str) {
    lines.extend(wrap_display(text, PAPER_COLS));
}

/// Left-pads text so it sits centered within `width` display columns.
fn center(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    let pad = (width - text_width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn minute_precision(timestamp: &str) -> &str {
    timestamp.get(..16).unwrap_or(timestamp)
}

fn est_lines(text: &str, chars_per_line: usize) -> f64 {
    (text.chars().count() / chars_per_line + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ReceiptProfile {
        ReceiptProfile {
            clinic_name: "仁心堂".to_string(),
            title: "中医干预中药处方".to_string(),
            font_size: 9,
            line_spacing: 0.85,
            safety_margin: 1.5,
            margin_cm: 0.2,
        }
    }

    fn sample() -> Prescription {
        let mut rx = Prescription::new("张三".to_string(), "当归10克\n白芍15克".to_string());
        rx.age = "45".to_string();
        rx.phone = "13800138000".to_string();
        rx.diagnosis = "气血两虚".to_string();
        rx.usage = "水煎服，每日一剂".to_string();
        rx.doctor = "李医生".to_string();
        rx.created_at = "2024-03-15 09:30:00".to_string();
        rx
    }

    #[test]
    fn test_wrap_display_ascii() {
        assert_eq!(wrap_display("abcdef", 4), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_wrap_display_cjk_double_width() {
        // Each character is two columns, so three fit per line
        let lines = wrap_display("当归白芍川芎熟地", 6);
        assert_eq!(lines, vec!["当归白", "芍川芎", "熟地"]);
    }

    #[test]
    fn test_wrap_display_mixed_width() {
        // 田(2) 七(2) 1(1) 0(1) = 6 columns, 克(2) wraps
        let lines = wrap_display("田七10克", 6);
        assert_eq!(lines, vec!["田七10", "克"]);
    }

    #[test]
    fn test_wrap_display_empty() {
        assert_eq!(wrap_display("", 22), vec![String::new()]);
    }

    #[test]
    fn test_render_layout() {
        let text = render(&sample(), &profile());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(22));
        assert!(lines[1].contains("仁心堂"));
        assert!(lines[2].contains("中医干预中药处方"));
        assert!(text.contains("姓名：张三"));
        assert!(text.contains("性别：男  年龄：45"));
        assert!(text.contains("日期：2024-03-15 09:30"));
        assert!(text.contains("中医辨证：气血两虚"));
        assert!(text.contains("  当归10克"));
        assert!(text.contains("用法：水煎服，每日一剂"));
        assert!(text.contains("开方医生：李医生"));
        assert_eq!(*lines.last().unwrap(), "=".repeat(22));
    }

    #[test]
    fn test_render_omits_empty_optional_lines() {
        let mut rx = sample();
        rx.diagnosis = String::new();
        rx.doctor = String::new();
        rx.doctor_phone = String::new();
        let mut p = profile();
        p.clinic_name = String::new();

        let text = render(&rx, &p);
        assert!(!text.contains("中医辨证"));
        assert!(!text.contains("开方医生"));
        assert!(!text.contains("联系电话"));
        assert!(!text.contains("仁心堂"));
    }

    #[test]
    fn test_render_wraps_long_herb_lines() {
        let mut rx = sample();
        rx.herbs = "当归白芍川芎熟地黄党参黄芪白术茯苓甘草大枣".to_string();
        let text = render(&rx, &profile());
        for line in text.lines() {
            let cols: usize = line.chars().map(|c| c.width().unwrap_or(0)).sum();
            assert!(cols <= PAPER_COLS, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn test_estimate_grows_with_content() {
        let short = sample();
        let mut long = sample();
        long.herbs = (0..20)
            .map(|i| format!("药材{}号10克", i))
            .collect::<Vec<_>>()
            .join("\n");

        let p = profile();
        assert!(estimate_height_cm(&long, &p) > estimate_height_cm(&short, &p));
    }

    #[test]
    fn test_estimate_scales_with_safety_margin() {
        let rx = sample();
        let mut loose = profile();
        loose.safety_margin = 2.5;
        assert!(estimate_height_cm(&rx, &loose) > estimate_height_cm(&rx, &profile()));
    }

    #[test]
    fn test_estimate_caps_at_a4_length() {
        let mut rx = sample();
        rx.herbs = (0..500)
            .map(|i| format!("药材{}号10克", i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(estimate_height_cm(&rx, &profile()), 29.7);
    }
}
