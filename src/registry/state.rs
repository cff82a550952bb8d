use crate::models::ChatThread;

/// Plain data behind the registry lock.
#[derive(Debug, Default)]
pub(super) struct RegistryState {
    pub threads: Vec<ChatThread>,
    pub selected: Option<String>,
    /// User for whom the default thread has already been attempted.
    bootstrapped_for: Option<String>,
}

impl RegistryState {
    pub fn contains(&self, id: &str) -> bool {
        self.threads.iter().any(|t| t.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&ChatThread> {
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChatThread> {
        self.threads.iter_mut().find(|t| t.id == id)
    }

    /// Swap in a fresh list and select its first thread.
    pub fn replace(&mut self, threads: Vec<ChatThread>) {
        self.selected = threads.first().map(|t| t.id.clone());
        self.threads = threads;
    }

    pub fn prepend(&mut self, thread: ChatThread) {
        self.selected = Some(thread.id.clone());
        self.threads.retain(|t| t.id != thread.id);
        self.threads.insert(0, thread);
    }

    /// Remove a thread; a removed selection falls back to the newest thread.
    pub fn remove(&mut self, id: &str) {
        self.threads.retain(|t| t.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = self.threads.first().map(|t| t.id.clone());
        }
    }

    /// Mark the bootstrap as attempted for `user_id`. Returns `false` if it
    /// already was.
    pub fn claim_bootstrap(&mut self, user_id: &str) -> bool {
        if self.bootstrapped_for.as_deref() == Some(user_id) {
            return false;
        }
        self.bootstrapped_for = Some(user_id.to_string());
        true
    }
}
