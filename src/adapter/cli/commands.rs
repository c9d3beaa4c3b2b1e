use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use unicode_width::UnicodeWidthStr;

use super::state::CliState;
use super::{AddArgs, ConfigAction};
use crate::application::service::ExportFormat;
use crate::domain::lexicon::Category;
use crate::domain::model::Prescription;
use crate::infrastructure::config::{loader, LayoutPreset};
use crate::infrastructure::printing;

pub fn add(state: &CliState, args: AddArgs) -> anyhow::Result<()> {
    let herbs = collect_herb_lines(&args)?;

    let mut rx = Prescription::new(args.name, herbs.join("\n"));
    rx.gender = args.gender;
    rx.age = args.age;
    rx.phone = args.phone;
    rx.diagnosis = args.diagnosis;
    rx.usage = args
        .usage
        .unwrap_or_else(|| state.settings.default_usage.clone());
    rx.doctor = args
        .doctor
        .unwrap_or_else(|| state.settings.default_doctor.clone());
    rx.doctor_phone = args
        .doctor_phone
        .unwrap_or_else(|| state.settings.default_phone.clone());

    let rx = state.prescriptions.create(rx)?;

    println!("Saved {}", rx.id);
    println!();
    println!("{}", state.receipts.render(&rx));
    println!();
    println!(
        "Estimated paper length: {:.1} cm",
        state.receipts.estimate_height_cm(&rx)
    );

    if args.print {
        let printer = args.printer.or_else(printing::resolve_printer);
        let path = state.receipts.print(&rx, printer.as_deref())?;
        println!("Receipt sent to printer: {}", path.display());
    }
    Ok(())
}

pub fn list(state: &CliState, pattern: Option<String>, limit: Option<usize>) -> anyhow::Result<()> {
    let records = match pattern.as_deref() {
        Some(fragment) => state.prescriptions.search(fragment)?,
        None => state.prescriptions.get_all()?,
    };

    if records.is_empty() {
        println!("no records");
        return Ok(());
    }

    let shown = limit.unwrap_or(records.len()).min(records.len());
    for rx in &records[..shown] {
        println!("{}", list_row(rx));
    }
    if shown < records.len() {
        println!("... and {} more", records.len() - shown);
    }
    Ok(())
}

/// One list line: id, 姓名, date, 中医辨证, herbs summary.
fn list_row(rx: &Prescription) -> String {
    let diagnosis: String = rx.diagnosis.chars().take(8).collect();
    format!(
        "{}  {}  {}  {}  {}",
        rx.id,
        pad_display(&rx.patient_name, 8),
        rx.created_day(),
        pad_display(&diagnosis, 16),
        rx.summary()
    )
}

pub fn show(state: &CliState, id: &str, receipt: bool) -> anyhow::Result<()> {
    let rx = state.prescriptions.get(id)?;

    if receipt {
        println!("{}", state.receipts.render(&rx));
        println!();
        println!(
            "Estimated paper length: {:.1} cm",
            state.receipts.estimate_height_cm(&rx)
        );
        return Ok(());
    }

    println!("处方 {}", rx.id);
    println!("患者姓名：{}", rx.patient_name);
    println!("性    别：{}", rx.gender);
    println!("年    龄：{}", rx.age);
    println!("电    话：{}", rx.phone);
    println!("就诊日期：{}", rx.created_at);
    println!("中医辨证：{}", rx.diagnosis);
    println!("处方内容：");
    for line in rx.herb_lines() {
        println!("  {}", line);
    }
    println!("用    法：{}", rx.usage);
    println!("开方医生：{}", rx.doctor);
    println!("医生电话：{}", rx.doctor_phone);
    match &rx.printed_at {
        Some(printed_at) => println!("打印时间：{}", printed_at),
        None => println!("打印时间：未打印"),
    }
    Ok(())
}

pub fn delete(state: &CliState, id: &str, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let rx = state.prescriptions.get(id)?;
        bail!(
            "this deletes the record for {} created {}; re-run with --yes to confirm",
            rx.patient_name,
            rx.created_at
        );
    }
    state.prescriptions.delete(id)?;
    println!("Deleted {}", id);
    Ok(())
}

pub fn print(
    state: &CliState,
    id: &str,
    printer: Option<String>,
    no_dispatch: bool,
) -> anyhow::Result<()> {
    let rx = state.prescriptions.get(id)?;

    if no_dispatch {
        let path = state.receipts.archive(&rx)?;
        println!("Receipt written to {}", path.display());
        return Ok(());
    }

    let printer = printer.or_else(printing::resolve_printer);
    match &printer {
        Some(name) => tracing::info!(printer = %name, "Dispatching receipt"),
        None => tracing::info!("Dispatching receipt to the system default printer"),
    }

    let path = state.receipts.print(&rx, printer.as_deref())?;
    println!("Receipt sent to printer: {}", path.display());
    Ok(())
}

pub fn export(state: &CliState, path: &Path, format: &str) -> anyhow::Result<()> {
    let format = ExportFormat::parse(format)
        .with_context(|| format!("unknown format {:?}, expected csv or json", format))?;

    let count = state.export.export(path, format)?;
    println!("Exported {} records to {}", count, path.display());
    Ok(())
}

pub fn suggest(
    state: &CliState,
    category: &str,
    filter: Option<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    if !state.settings.completion_enabled {
        bail!("completion is disabled; enable with `fangji config set completion_enabled true`");
    }

    let category = Category::parse(category).with_context(|| {
        format!(
            "unknown category {:?}, expected herbs, diagnoses, formulas, usages or all",
            category
        )
    })?;

    let lexicon = state.lexicon.build()?;
    if lexicon.is_empty() {
        println!("lexicon is empty; add prescriptions first");
        return Ok(());
    }

    let terms = match filter {
        Some(fragment) => lexicon.filter(category, &fragment),
        None => lexicon.terms(category).to_vec(),
    };

    let shown = limit.unwrap_or(terms.len()).min(terms.len());
    for term in &terms[..shown] {
        println!("{}", term);
    }
    Ok(())
}

pub fn printers() -> anyhow::Result<()> {
    let printers = printing::list_printers()?;
    if printers.is_empty() {
        println!("no printers found");
        return Ok(());
    }

    let default = printing::default_printer();
    let preferred = printing::pick_preferred(&printers, default.as_deref()).map(str::to_string);

    for name in &printers {
        let marker = if Some(name.as_str()) == preferred.as_deref() {
            "*"
        } else {
            " "
        };
        let suffix = if Some(name.as_str()) == default.as_deref() {
            "  (default)"
        } else {
            ""
        };
        println!("{} {}{}", marker, name, suffix);
    }
    println!();
    println!("* receipt destination");
    Ok(())
}

pub fn config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = loader::load_user_settings();
            print!("{}", serde_yaml::to_string(&settings)?);
        }
        ConfigAction::Set { key, value } => {
            let mut settings = loader::load_user_settings();
            settings.set(&key, &value)?;
            loader::save_user_settings(&settings)?;
            println!("{} = {}", key, value);
        }
        ConfigAction::Preset { name } => {
            let preset = LayoutPreset::parse(&name).with_context(|| {
                format!("unknown preset {:?}, expected minimal, standard or loose", name)
            })?;
            let mut settings = loader::load_user_settings();
            settings.apply_preset(preset);
            loader::save_user_settings(&settings)?;
            println!(
                "font_size={} line_spacing={} safety_margin={} margin_cm={}",
                settings.font_size, settings.line_spacing, settings.safety_margin, settings.margin_cm
            );
        }
        ConfigAction::Path => {
            println!("{}", loader::settings_file_path().display());
        }
    }
    Ok(())
}

fn collect_herb_lines(args: &AddArgs) -> anyhow::Result<Vec<String>> {
    if !args.herbs.is_empty() {
        return Ok(args.herbs.clone());
    }
    if args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("reading herb lines from stdin")?;
        return Ok(input.lines().map(str::to_string).collect());
    }
    bail!("no herb lines given; use --herb or --stdin");
}

/// Right-pads to a display-column width so CJK names line up.
fn pad_display(text: &str, cols: usize) -> String {
    let width = text.width();
    if width >= cols {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(cols - width))
}
