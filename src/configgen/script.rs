//! Line builder for generated shell scripts and env lists
//!
//! Keeps the fixed skeleton of a generated file (commands, comments) apart
//! from the substituted fields (quoted assignments, env entries).

/// Accumulates the lines of a generated file
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    body: String,
}

impl ScriptBuilder {
    /// Empty file
    pub fn new() -> Self {
        Self::default()
    }

    /// Bash script starting with a shebang and a blank line
    pub fn bash() -> Self {
        let mut script = Self::new();
        script.line("#!/bin/bash").blank();
        script
    }

    /// Append a line verbatim
    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
        self
    }

    /// Append several lines verbatim
    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.body.push('\n');
        self
    }

    /// `NAME='value'`
    pub fn assign(&mut self, name: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(format!("{}='{}'", name, value))
    }

    /// `NAME=value`
    pub fn env(&mut self, name: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(format!("{}={}", name, value))
    }

    /// `ARRAY[@KEY@]=value`, value written as given
    pub fn conf(&mut self, array: &str, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(format!("{}[@{}@]={}", array, key, value))
    }

    /// `ARRAY[@KEY@]='value'`
    pub fn conf_quoted(&mut self, array: &str, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(format!("{}[@{}@]='{}'", array, key, value))
    }

    pub fn finish(self) -> String {
        self.body
    }
}
