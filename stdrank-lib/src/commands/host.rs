use std::io::Write;

/// The process surroundings a command talks to.
///
/// Commands never print or exit directly, so they can be driven from tests.
pub trait Host: Send + Sync {
    /// Destination for results and success messages (e.g. stdout)
    fn output(&mut self) -> impl Write;

    /// Destination for diagnostics (e.g. stderr)
    fn error(&mut self) -> impl Write;

    /// Terminate the process. A test host records the code and returns.
    fn exit(&mut self, code: i32);
}

/// Host that captures everything in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
