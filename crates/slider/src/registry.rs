type Release = Box<dyn FnOnce()>;

/// Release list for everything acquired during initialisation.
///
/// Entries are released in reverse acquisition order, each exactly once.
#[derive(Default)]
pub struct ResourceRegistry {
    entries: Vec<(String, Release)>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, label: impl Into<String>, release: impl FnOnce() + 'static) {
        let label = label.into();
        tracing::trace!(resource = %label, "registered resource");
        self.entries.push((label, Box::new(release)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        while let Some((label, release)) = self.entries.pop() {
            tracing::trace!(resource = %label, "releasing resource");
            release();
            released += 1;
        }
        released
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}
