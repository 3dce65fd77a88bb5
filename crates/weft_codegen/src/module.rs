//! Verilog module descriptors and their text rendering.

/// A module parameter with its default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Default value; absent or empty values render as `0`.
    pub value: Option<String>,
}

impl Param {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One port declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortDecl {
    /// Port name.
    pub name: String,
    /// Bit range such as `[3:0]`.
    pub range: Option<String>,
}

impl PortDecl {
    /// Creates a port declaration.
    pub fn new(name: impl Into<String>, range: Option<String>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    fn render(&self, direction: &str) -> String {
        match &self.range {
            Some(range) => format!(" {direction} {range} {}", self.name),
            None => format!(" {direction} {}", self.name),
        }
    }
}

/// Input and output port declarations, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortList {
    /// Input ports.
    pub inputs: Vec<PortDecl>,
    /// Output ports.
    pub outputs: Vec<PortDecl>,
}

impl PortList {
    /// Returns `true` if there are no ports at all.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

/// Everything needed to render one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Module name. An empty name renders nothing.
    pub name: String,
    /// Parameter clause entries.
    pub params: Vec<Param>,
    /// Port clause entries.
    pub ports: PortList,
    /// Body text, one statement per line, not yet indented.
    pub body: String,
}

/// Renders a module descriptor as Verilog text.
///
/// The parameter clause and the port clause are only emitted when non-empty.
/// Every body line is indented by one space.
pub fn render_module(module: &ModuleDescriptor) -> String {
    if module.name.is_empty() {
        return String::new();
    }

    let mut code = format!("\nmodule {}", module.name);

    if !module.params.is_empty() {
        let params: Vec<String> = module
            .params
            .iter()
            .map(|p| {
                let value = p.value.as_deref().filter(|v| !v.is_empty()).unwrap_or("0");
                format!(" parameter {} = {}", p.name, value)
            })
            .collect();
        code.push_str(" #(\n");
        code.push_str(&params.join(",\n"));
        code.push_str("\n)");
    }

    if !module.ports.is_empty() {
        let ports: Vec<String> = module
            .ports
            .inputs
            .iter()
            .map(|p| p.render("input"))
            .chain(module.ports.outputs.iter().map(|p| p.render("output")))
            .collect();
        code.push_str(" (\n");
        code.push_str(&ports.join(",\n"));
        code.push_str("\n)");
    }

    code.push_str(";\n");

    if !module.body.is_empty() {
        let body: Vec<String> = module.body.split('\n').map(|l| format!(" {l}")).collect();
        code.push_str(&body.join("\n"));
    }

    code.push_str("\nendmodule\n");
    code
}
