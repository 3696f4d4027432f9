use phonoreflex::{Category, Layer, McEntry, McInfoStyle, ReflexRun, Reflexes};

/// Terminal styling of the report, by role rather than by color.
mod style {
    const RESET: &str = "\x1b[0m";

    pub enum Role {
        Heading,
        Section,
        Label,
        Changed,
        Form,
        Rule,
        Quiet,
    }

    impl Role {
        fn code(&self) -> &'static str {
            match self {
                Role::Heading => "\x1b[1;36m",
                Role::Section => "\x1b[90m",
                Role::Label => "\x1b[34m",
                Role::Changed => "\x1b[1;32m",
                Role::Form => "\x1b[33m",
                Role::Rule => "\x1b[36m",
                Role::Quiet => "\x1b[2m",
            }
        }
    }

    pub struct Styler {
        color: bool,
    }

    impl Styler {
        pub fn new(color: bool) -> Self {
            Self { color }
        }

        pub fn apply(&self, text: impl AsRef<str>, role: Role) -> String {
            if self.color { format!("{}{}{RESET}", role.code(), text.as_ref()) } else { text.as_ref().to_string() }
        }

        pub fn section(&self, title: &str) -> String {
            self.apply(format!("━━━ {title} ━━━"), Role::Section)
        }
    }
}

use style::{Role, Styler};

fn layer_name(layer: Layer) -> &'static str {
    match layer {
        Layer::Default => "default",
        Layer::Vernacular => "白 vernacular",
        Layer::Recent => "新 recent",
    }
}

/// Predicted readings of a category, with the rules that fired per layer.
pub fn print_prediction(category: &Category, input: &str, reflexes: &Reflexes, runs: &[ReflexRun], color: bool) {
    let styler = Styler::new(color);
    let heading = format!("⚙  Predicting: {} {} \"{input}\"", category.initials.to_chars(), category.final_class);
    println!("\n{}", styler.apply(heading, Role::Heading));

    println!("\n{}", styler.section("Readings"));
    print_reflexes(reflexes, &styler);

    println!("\n{}", styler.section("Rules"));
    print_runs(runs, &styler);
    println!();
}

/// A catalog entry with its recorded readings and the predicted ones.
pub fn print_entry(
    index: usize,
    entry: &McEntry,
    recorded: &[(String, String)],
    predicted: Option<(&Reflexes, &[ReflexRun])>,
    color: bool,
) {
    let styler = Styler::new(color);
    let heading = format!("⚙  小韻 {index}: {} {}", entry.info.character, entry.info.describe(&McInfoStyle::default()));
    println!("\n{}", styler.apply(heading, Role::Heading));
    println!(
        "  {} {}  {} {}",
        styler.apply("反切:", Role::Quiet),
        entry.info.fanqie.as_deref().unwrap_or("-"),
        styler.apply("│ 字數:", Role::Quiet),
        styler.apply(entry.char_count.to_string(), Role::Form)
    );

    println!("\n{}", styler.section("Recorded"));
    if recorded.is_empty() {
        println!("{}", styler.apply("  No reflex recorded", Role::Quiet));
    }
    for (label, pronunciation) in recorded {
        let label = if label.is_empty() { "default" } else { label.as_str() };
        println!("  {} {}", styler.apply(format!("{label:>8}"), Role::Label), styler.apply(pronunciation, Role::Changed));
    }

    if let Some((reflexes, runs)) = predicted {
        println!("\n{}", styler.section("Predicted"));
        print_reflexes(reflexes, &styler);
        println!("\n{}", styler.section("Rules"));
        print_runs(runs, &styler);
    }
    println!();
}

fn print_reflexes(reflexes: &Reflexes, styler: &Styler) {
    for layer in Layer::ALL {
        let reading = reflexes.get(layer);
        let changed = layer != Layer::Default && reading != reflexes.default;
        println!(
            "  {} {}",
            styler.apply(format!("{:<14}", layer_name(layer)), Role::Label),
            styler.apply(reading, if changed { Role::Changed } else { Role::Quiet })
        );
    }
}

fn print_runs(runs: &[ReflexRun], styler: &Styler) {
    for run in runs {
        let fired = run.traces.len();
        println!(
            "  {} {}  {}",
            styler.apply(format!("{}:", layer_name(run.layer)), Role::Label),
            if fired > 0 {
                styler.apply(format!("✓ {fired} fired"), Role::Changed)
            } else {
                styler.apply("✗ none fired", Role::Quiet)
            },
            styler.apply(format!("{} matched │ {:?}", run.rules_matched, run.duration), Role::Quiet)
        );
        for trace in &run.traces {
            println!(
                "    {} {} {} {}",
                styler.apply(trace.rule, Role::Rule),
                styler.apply(&trace.before, Role::Form),
                styler.apply("→", Role::Quiet),
                styler.apply(&trace.after, Role::Form)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::style::{Role, Styler};

    #[test]
    fn plain_output_has_no_escape_codes() {
        let plain = Styler::new(false);
        assert_eq!(plain.apply("tan1", Role::Changed), "tan1");
        assert_eq!(plain.section("Rules"), "━━━ Rules ━━━");

        let colored = Styler::new(true).apply("tan1", Role::Form);
        assert!(colored.starts_with("\x1b[33m"));
        assert!(colored.ends_with("tan1\x1b[0m"));
    }
}
