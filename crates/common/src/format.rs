use std::fmt;

/// A formatter which indents every line it writes by the current depth.
pub struct IndentFormatter<W> {
    w: W,
    depth: usize,
    indent_size: usize,
    at_line_start: bool,
}

impl<W> IndentFormatter<W>
where
    W: fmt::Write,
{
    pub fn new(writer: W, indent_size: usize) -> Self {
        IndentFormatter {
            w: writer,
            depth: 0,
            indent_size,
            at_line_start: true,
        }
    }

    pub fn increase_depth(&mut self) {
        self.depth += 1;
    }

    pub fn decrease_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn indent<F>(&mut self, f: F) -> fmt::Result
    where
        F: FnOnce(&mut IndentFormatter<W>) -> fmt::Result,
    {
        self.increase_depth();
        let res = f(self);
        self.decrease_depth();
        res
    }

    fn write_line_part(&mut self, part: &str) -> fmt::Result {
        if part.is_empty() {
            return Ok(());
        }
        if self.at_line_start {
            for _ in 0..(self.indent_size * self.depth) {
                self.w.write_char(' ')?;
            }
            self.at_line_start = false;
        }
        self.w.write_str(part)
    }
}

impl<W> fmt::Write for IndentFormatter<W>
where
    W: fmt::Write,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');

        if let Some(x) = lines.next() {
            self.write_line_part(x)?;
        }

        for l in lines {
            self.w.write_char('\n')?;
            self.at_line_start = true;
            self.write_line_part(l)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::fmt::Write;

    use super::IndentFormatter;

    #[test]
    fn indents_nested_lines() {
        let mut out = String::new();
        let mut fmt = IndentFormatter::new(&mut out, 2);
        writeln!(fmt, "a {{").unwrap();
        fmt.indent(|fmt| writeln!(fmt, "b")).unwrap();
        writeln!(fmt, "}}").unwrap();
        assert_eq!(out, "a {\n  b\n}\n");
    }
}
