//! Terminal implementations of the missing-field form.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use clap::ValueEnum;
use formfill_core::{DeclineChoice, FieldForm, FillRequest, FormReply};
use tracing::warn;

/// What to do with records that lack template fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingPolicy {
    /// Prompt on the terminal for each record.
    Ask,
    /// Leave such records out.
    Skip,
    /// Render them with the missing fields blank.
    Blank,
}

/// Non-interactive form: always declines, then applies a fixed choice.
pub struct PolicyForm(pub DeclineChoice);

impl FieldForm for PolicyForm {
    fn request(&mut self, _request: &FillRequest) -> FormReply {
        FormReply::Decline
    }

    fn on_decline(&mut self, _request: &FillRequest) -> DeclineChoice {
        self.0
    }
}

/// Line-based prompt over any reader/writer pair.
pub struct PromptForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one trimmed line. `None` on end of input.
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    fn try_request(&mut self, request: &FillRequest) -> std::io::Result<FormReply> {
        writeln!(
            self.output,
            "\nRow {}  学号：{}  姓名：{}",
            request.row,
            request.id.as_deref().unwrap_or("N/A"),
            request.name.as_deref().unwrap_or("N/A"),
        )?;
        writeln!(
            self.output,
            "These fields are missing from the data; fill them in (blank leaves them empty):"
        )?;

        let mut values = BTreeMap::new();
        for field in &request.missing {
            let Some(value) = self.ask(&format!("  {field}: "))? else {
                return Ok(FormReply::Decline);
            };
            values.insert(field.clone(), value);
        }

        match self.ask("Use these values? [Y/n] ")? {
            Some(answer) if answer.is_empty() || answer.eq_ignore_ascii_case("y") => {
                Ok(FormReply::Fill(values))
            }
            _ => Ok(FormReply::Decline),
        }
    }

    fn try_on_decline(&mut self) -> std::io::Result<DeclineChoice> {
        let answer = self.ask("Skip this record, or generate it with blank fields? [S/b] ")?;
        Ok(match answer {
            Some(a) if a.eq_ignore_ascii_case("b") => DeclineChoice::ProceedBlank,
            _ => DeclineChoice::Skip,
        })
    }
}

impl<R: BufRead, W: Write> FieldForm for PromptForm<R, W> {
    fn request(&mut self, request: &FillRequest) -> FormReply {
        self.try_request(request).unwrap_or_else(|e| {
            warn!(row = request.row, error = %e, "prompt failed, treating as cancelled");
            FormReply::Decline
        })
    }

    fn on_decline(&mut self, request: &FillRequest) -> DeclineChoice {
        self.try_on_decline().unwrap_or_else(|e| {
            warn!(row = request.row, error = %e, "prompt failed, skipping record");
            DeclineChoice::Skip
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Cursor;

    use super::*;

    fn request() -> FillRequest {
        FillRequest {
            row: 3,
            id: Some("1001".into()),
            name: None,
            missing: BTreeSet::from(["备注".to_string(), "班级".to_string()]),
        }
    }

    #[test]
    fn collects_values_in_field_order() {
        let mut out = Vec::new();
        let mut form = PromptForm::new(Cursor::new("n/a\nCS1\n\n"), &mut out);
        let reply = form.request(&request());
        assert_eq!(
            reply,
            FormReply::Fill(BTreeMap::from([
                ("备注".to_string(), "n/a".to_string()),
                ("班级".to_string(), "CS1".to_string()),
            ]))
        );
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("学号：1001"));
        assert!(shown.contains("姓名：N/A"));
    }

    #[test]
    fn refusing_confirmation_declines() {
        let mut form = PromptForm::new(Cursor::new("a\nb\nn\n"), Vec::new());
        assert_eq!(form.request(&request()), FormReply::Decline);
    }

    #[test]
    fn end_of_input_declines_and_skips() {
        let mut form = PromptForm::new(Cursor::new(""), Vec::new());
        assert_eq!(form.request(&request()), FormReply::Decline);
        assert_eq!(form.on_decline(&request()), DeclineChoice::Skip);
    }

    #[test]
    fn decline_choice() {
        let mut form = PromptForm::new(Cursor::new("b\n"), Vec::new());
        assert_eq!(form.on_decline(&request()), DeclineChoice::ProceedBlank);
        let mut form = PromptForm::new(Cursor::new("s\n"), Vec::new());
        assert_eq!(form.on_decline(&request()), DeclineChoice::Skip);
    }

    #[test]
    fn policy_form_never_prompts() {
        let mut form = PolicyForm(DeclineChoice::ProceedBlank);
        assert_eq!(form.request(&request()), FormReply::Decline);
        assert_eq!(form.on_decline(&request()), DeclineChoice::ProceedBlank);
    }
}
