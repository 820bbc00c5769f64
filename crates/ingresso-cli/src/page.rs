use ingresso_core::FormField;
use ingresso_delivery::Page;

const SUBMIT_LABEL: &str = "Comprar ingresso";

/// Stand-in for the browser page when submitting from a terminal: alerts
/// and focus go to stderr, navigation to stdout unless a JSON report was
/// requested.
pub struct TerminalPage {
    label: String,
    quiet: bool,
}

impl TerminalPage {
    pub fn new(quiet: bool) -> Self {
        Self {
            label: SUBMIT_LABEL.to_string(),
            quiet,
        }
    }
}

impl Page for TerminalPage {
    fn disable_submit(&mut self, busy_label: &str) -> String {
        if !self.quiet {
            eprintln!("{busy_label}");
        }
        std::mem::replace(&mut self.label, busy_label.to_string())
    }

    fn enable_submit(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn focus(&mut self, field: FormField) {
        eprintln!("campo: {}", field.element_id());
    }

    fn open_new_context(&mut self, url: &str) {
        if !self.quiet {
            println!("pagamento: {url}");
        }
    }

    fn navigate(&mut self, url: &str) {
        if !self.quiet {
            println!("redirecionando: {url}");
        }
    }
}
