//! Indenting writer for C++ items.

use super::{ClassDef, Function, Item, Stmt};

/// Accumulates generated source with four-space indentation.
pub struct CppWriter {
    /// Current indentation level.
    indent: usize,
    output: String,
}

impl Default for CppWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CppWriter {
    pub fn new() -> Self {
        Self {
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn write_items(&mut self, items: &[Item]) {
        for item in items {
            self.write_item(item);
        }
    }

    pub fn write_item(&mut self, item: &Item) {
        match item {
            Item::Raw(text) => {
                for line in text.lines() {
                    self.writeln(line);
                }
            }
            Item::Blank => self.newline(),
            Item::ForwardClass(name) => self.writeln(&forward_class(name)),
            Item::Prototype(sig) => self.writeln(&format!("{sig};")),
            Item::Function(function) => self.write_function(function),
            Item::Global(global) => self.writeln(&global.to_string()),
            Item::ExternC(globals) => {
                self.writeln("extern \"C\" {");
                self.indent();
                for global in globals {
                    self.writeln(&global.to_string());
                }
                self.dedent();
                self.writeln("}");
            }
            Item::Class(class) => self.write_class(class),
        }
    }

    fn write_function(&mut self, function: &Function) {
        if function.init_list.is_empty() {
            self.writeln(&format!("{} {{", function.sig));
        } else {
            let inits: Vec<String> = function.init_list.iter().map(ToString::to_string).collect();
            self.writeln(&format!("{} : {} {{", function.sig, inits.join(", ")));
        }
        self.indent();
        self.write_stmts(&function.body);
        self.dedent();
        self.writeln("}");
    }

    fn write_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.writeln(&stmt.to_string());
        }
    }

    fn write_class(&mut self, class: &ClassDef) {
        self.writeln(&format!("class {} : public {} {{", class.name, class.base));
        self.writeln("private:");
        self.indent();
        for field in &class.fields {
            self.writeln(&format!("{field};"));
        }
        self.dedent();
        self.writeln("public:");
        self.indent();
        for member in &class.members {
            let prefix = if member.is_virtual { "virtual " } else { "" };
            self.writeln(&format!("{prefix}{};", member.sig));
        }
        self.dedent();
        self.writeln("};");
    }
}

/// `class C;`, nested in namespace blocks for a scoped name.
fn forward_class(name: &str) -> String {
    let mut parts: Vec<&str> = name.split("::").collect();
    let class = parts.pop().unwrap_or(name);
    let mut line = String::new();
    for ns in &parts {
        line.push_str(&format!("namespace {ns} {{ "));
    }
    line.push_str(&format!("class {class};"));
    for _ in &parts {
        line.push_str(" }");
    }
    line
}
