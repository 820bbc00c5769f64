use ingresso_core::FormField;

/// The host page the pipeline drives. Implementations own the markup; the
/// pipeline only toggles the submit control, raises alerts, moves focus and
/// navigates.
pub trait Page {
    /// Disables the submit control and shows `busy_label`. Returns the label
    /// it replaced so it can be restored.
    fn disable_submit(&mut self, busy_label: &str) -> String;
    fn enable_submit(&mut self, label: &str);
    fn alert(&mut self, message: &str);
    fn focus(&mut self, field: FormField);
    /// Opens `url` in a new browsing context, leaving the current one alone.
    fn open_new_context(&mut self, url: &str);
    fn navigate(&mut self, url: &str);
}
