/// Gate in front of a destructive action.
///
/// Idle until armed with a target; `confirm` hands the target back exactly
/// once and disarms, `cancel` disarms without handing anything back.
#[derive(Debug)]
pub struct ConfirmationPrompt<T> {
    pending: Option<T>,
}

impl<T> Default for ConfirmationPrompt<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ConfirmationPrompt<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the prompt. A previously pending target is replaced.
    pub fn arm(&mut self, target: T) {
        self.pending = Some(target);
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
