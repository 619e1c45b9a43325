use std::fmt;

/// Which kind of check produced a [`Failure`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Check {
    /// A container command exited with an unexpected code
    ExitCode,
    /// A volume was still listed on an endpoint after removal
    VolumeRemoved,
}

/// A failed assertion that did not stop the run
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    pub check: Check,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a sanity run that reached the end
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    failures: Vec<Failure>,
    containers_run: usize,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure and keep going
    pub fn fail(&mut self, check: Check, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.failures.push(Failure { check, message });
    }

    pub(crate) fn container_ran(&mut self) {
        self.containers_run += 1;
    }

    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    #[must_use]
    pub fn containers_run(&self) -> usize {
        self.containers_run
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "PASS ({} containers run)", self.containers_run);
        }

        write!(
            f,
            "FAIL ({} failures, {} containers run)",
            self.failures.len(),
            self.containers_run
        )?;
        for failure in &self.failures {
            write!(f, "\n\t{}", failure)?;
        }
        Ok(())
    }
}
