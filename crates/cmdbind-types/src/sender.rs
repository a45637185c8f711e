//! The invoking identity.

/// Whoever issued a command: a player, a remote client, the console.
///
/// Senders receive feedback during execution and answer permission checks.
pub trait Sender: Send + Sync {
    /// Display name of the sender.
    fn name(&self) -> &str;

    /// Plain informational feedback.
    fn send_message(&self, msg: &str);

    /// Failure feedback. Front-ends typically highlight this.
    fn fail(&self, msg: &str) {
        self.send_message(&format!("error: {msg}"));
    }

    /// Success feedback.
    fn success(&self, msg: &str) {
        self.send_message(&format!("success: {msg}"));
    }

    /// Whether this sender holds the given permission id.
    fn has_permission(&self, _permission: &str) -> bool {
        true
    }
}
