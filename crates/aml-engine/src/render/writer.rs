use html_escape::{encode_double_quoted_attribute, encode_text};

/// Output buffer that remembers which elements are still open, so a
/// well-formed prefix of the document can be cut at any point.
#[derive(Debug, Default)]
pub(crate) struct HtmlWriter {
    out: String,
    closers: Vec<&'static str>,
}

impl HtmlWriter {
    /// Writes an opening tag; `close` must be the matching end tag.
    pub fn open(&mut self, start: &str, close: &'static str) {
        self.out.push_str(start);
        self.closers.push(close);
    }

    pub fn close(&mut self) {
        if let Some(close) = self.closers.pop() {
            self.out.push_str(close);
        }
    }

    pub fn raw(&mut self, html: &str) {
        self.out.push_str(html);
    }

    /// Escaped text with line breaks turned into `<br>`.
    pub fn text(&mut self, text: &str) {
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.out.push_str(&encode_text(line));
            if lines.peek().is_some() {
                self.out.push_str("<br>\n");
            }
        }
    }

    /// Escaped text without line-break handling, for preformatted content.
    pub fn verbatim(&mut self, text: &str) {
        self.out.push_str(&encode_text(text));
    }

    /// What has been written so far, with every open element closed.
    pub fn closed_prefix(&self) -> String {
        let mut prefix = self.out.clone();
        for close in self.closers.iter().rev() {
            prefix.push_str(close);
        }
        prefix
    }

    pub fn finish(mut self) -> String {
        while !self.closers.is_empty() {
            self.close();
        }
        self.out
    }
}

/// ` name="value"` with the value escaped.
pub(crate) fn attr(name: &str, value: &str) -> String {
    format!(" {name}=\"{}\"", encode_double_quoted_attribute(value))
}
