// src/data_input/line_filter.rs

/// Line-level pre-processing applied to text sources before they are parsed.
///
/// The first line is replaced outright when `replace_first_line` is set (the
/// replacement is not stripped); every other line loses the characters in
/// `strip_characters`. `skip_header` lines are then dropped from the top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineFilter {
    pub skip_header: usize,
    pub strip_characters: Option<String>,
    pub replace_first_line: Option<String>,
}

impl LineFilter {
    pub fn is_identity(&self) -> bool {
        self.skip_header == 0 && self.strip_characters.is_none() && self.replace_first_line.is_none()
    }

    pub fn apply(&self, text: &str) -> String {
        if self.is_identity() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for (i, line) in text.lines().enumerate() {
            if i < self.skip_header {
                continue;
            }
            match (&self.replace_first_line, &self.strip_characters) {
                (Some(first), _) if i == 0 => out.push_str(first),
                (_, Some(strip)) => out.extend(line.chars().filter(|c| !strip.contains(*c))),
                _ => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }
}


// src/data_input/line_filter.rs
