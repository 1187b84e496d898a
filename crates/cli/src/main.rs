use std::fs;

use clap::{Parser, Subcommand};

use afb_core::{
    form::{AppraisalForm, FieldType},
    preview::Widget,
    sentiment::{MockSentimentAnalyzer, SentimentAnalyzer},
    store::FormStore,
    wire::FormDocument,
};

#[derive(Parser)]
#[command(name = "afb")]
#[command(about = "AFB appraisal form builder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Say hi
    Hi,
    /// Build a small demo form and print its document and preview
    Demo,
    /// Run the mock sentiment analyzer on a piece of text
    Analyze {
        /// Text to analyze
        text: String,
    },
    /// Check that a form document file parses cleanly
    Validate {
        /// Path to a form JSON file
        file: String,
    },
    /// Parse a form document file and print its preview rendering
    Render {
        /// Path to a form JSON file
        file: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Hi) => {
            println!("hi");
        }
        Some(Commands::Demo) => {
            let mut store = FormStore::new();
            let form = store.create_form().with_title("Annual Review");

            let form = form.with_section_added();
            let section_id = form.sections[0].id;
            let section = form.sections[0]
                .with_title("Performance")
                .with_field_added(FieldType::Label)
                .with_field_added(FieldType::Textbox)
                .with_field_added(FieldType::Score);
            let form = form.with_section_replaced(section_id, section);
            store.update_form(form);

            let current = store.current_form().ok_or("no current form")?;
            println!("{}", FormDocument::render(current)?);
            println!();
            print_preview(current);
        }
        Some(Commands::Analyze { text }) => {
            let analysis = MockSentimentAnalyzer.analyze(&text);
            println!(
                "label: {}, score: {:.3}, confidence: {:.3}",
                analysis.label, analysis.score, analysis.confidence
            );
        }
        Some(Commands::Validate { file }) => {
            let json_text = fs::read_to_string(&file)?;
            match FormDocument::parse(&json_text) {
                Ok(form) => println!(
                    "{file}: ok ({} sections, {} fields)",
                    form.sections.len(),
                    form.sections.iter().map(|s| s.fields.len()).sum::<usize>()
                ),
                Err(e) => eprintln!("{file}: {e}"),
            }
        }
        Some(Commands::Render { file }) => {
            let json_text = fs::read_to_string(&file)?;
            let form = FormDocument::parse(&json_text)?;
            print_preview(&form);
        }
        None => {
            println!("Use 'afb --help' for commands");
        }
    }

    Ok(())
}

/// Prints the preview rendering of a form: one widget line per field, in
/// section order.
fn print_preview(form: &AppraisalForm) {
    println!("Preview: {}", form.title);
    for section in &form.sections {
        println!("  [{}] {}", section.status.label(), section.title);
        for field in &section.fields {
            let widget = Widget::for_field(field);
            let detail = match &widget {
                Widget::RadioGroup { options }
                | Widget::Dropdown { options }
                | Widget::Checklist { options } => format!(" ({})", options.join(", ")),
                Widget::ScoreButtons { min, max } => format!(" ({min}..={max})"),
                _ => String::new(),
            };
            let required = if field.required { " *" } else { "" };
            println!("    {} -> {}{detail}{required}", field.label, widget.kind());
        }
    }
}
