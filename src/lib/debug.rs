use crate::model::{Block, Document, TextRun};

/// Escapes a string for use inside a JSON string literal.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

impl TextRun {
    fn to_readable_json(&self, indent_level: usize) -> String {
        let indent = "  ".repeat(indent_level);
        if self.line_break {
            return format!("{}{{ \"type\": \"LineBreak\" }}", indent);
        }
        format!(
            "{}{{ \"text\": \"{}\", \"bold\": {}, \"italic\": {}, \"space_before\": {} }}",
            indent,
            escape(&self.text),
            self.bold,
            self.italic,
            self.space_before
        )
    }
}

impl Block {
    /// Converts a block into a readable JSON object, runs one per line.
    fn to_readable_json(&self, indent_level: usize) -> String {
        let indent = "  ".repeat(indent_level);
        let inner_indent = "  ".repeat(indent_level + 1);

        let mut result = format!("{}{{\n", indent);
        match self.heading_level {
            Some(level) => {
                result.push_str(&format!("{}\"type\": \"Heading\",\n", inner_indent));
                result.push_str(&format!("{}\"level\": {},\n", inner_indent, level));
            }
            None => result.push_str(&format!("{}\"type\": \"Block\",\n", inner_indent)),
        }
        result.push_str(&format!("{}\"indent\": {},\n", inner_indent, self.indent));
        result.push_str(&format!("{}\"bold\": {},\n", inner_indent, self.bold));
        result.push_str(&format!("{}\"italic\": {},\n", inner_indent, self.italic));
        result.push_str(&format!("{}\"runs\": [\n", inner_indent));

        for (i, run) in self.runs.iter().enumerate() {
            result.push_str(&run.to_readable_json(indent_level + 2));
            if i < self.runs.len() - 1 {
                result.push(',');
            }
            result.push('\n');
        }

        result.push_str(&format!("{}]\n", inner_indent));
        result.push_str(&format!("{}}}", indent));
        result
    }
}

impl Document {
    /// Renders the model as an indented JSON array of blocks.
    pub fn to_readable_json(&self) -> String {
        let mut result = String::from("[\n");

        for (i, block) in self.blocks().iter().enumerate() {
            result.push_str(&block.to_readable_json(1));
            if i < self.len() - 1 {
                result.push(',');
            }
            result.push('\n');
        }

        result.push(']');
        result
    }

    /// Saves the model to a JSON file for inspection.
    ///
    /// # Example
    /// ```no_run
    /// let doc = mdpdf::markdown_to_document("# Title\n\nSome *text*").unwrap();
    /// doc.save_to_json_file("model.json").unwrap();
    /// ```
    pub fn save_to_json_file(&self, file_path: &str) -> std::io::Result<()> {
        std::fs::write(file_path, self.to_readable_json())
    }
}
