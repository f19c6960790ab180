//! Minimal VHDL document model. Emitters build these nodes and the `Display`
//! impls print them with fixed column alignment.

use std::fmt::{self, Display, Formatter};

use strum_macros::Display;

/// Column width of generic, port and association names.
const NAME_COLUMN: usize = 14;
/// Column width of signal declaration names.
const SIGNAL_COLUMN: usize = 12;
/// Column width of `case` choices, wide enough for `others`.
const CHOICE_COLUMN: usize = 6;

fn indent(f: &mut Formatter<'_>, level: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = level * 2)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    StdLogic,
    /// `std_logic_vector(<width>-1 downto 0)`
    Vector(String),
    Integer,
    IntegerRange(String, String),
    Named(String),
}

impl Ty {
    pub fn vector(width: impl Into<String>) -> Ty {
        Ty::Vector(width.into())
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ty::StdLogic => write!(f, "std_logic"),
            Ty::Vector(width) => write!(f, "std_logic_vector({width}-1 downto 0)"),
            Ty::Integer => write!(f, "integer"),
            Ty::IntegerRange(low, high) => write!(f, "integer range {low} to {high}"),
            Ty::Named(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Generic {
    pub name: String,
    pub ty: Ty,
    pub default: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub ty: Ty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub name: String,
    pub generics: Vec<Generic>,
    pub ports: Vec<Port>,
}

impl Entity {
    pub fn new(name: &str) -> Entity {
        Entity { name: name.to_string(), generics: vec![], ports: vec![] }
    }

    pub fn add_generic_int(&mut self, name: &str, default: u32) {
        self.generics.push(Generic { name: name.to_string(), ty: Ty::Integer, default: Some(default.to_string()) });
    }

    pub fn add_port(&mut self, name: &str, direction: Direction, ty: Ty) {
        self.ports.push(Port { name: name.to_string(), direction, ty });
    }

    pub fn add_input(&mut self, name: &str) {
        self.add_port(name, Direction::In, Ty::StdLogic);
    }

    pub fn add_input_vector(&mut self, name: &str, width: &str) {
        self.add_port(name, Direction::In, Ty::vector(width));
    }

    pub fn add_output_vector(&mut self, name: &str, width: &str) {
        self.add_port(name, Direction::Out, Ty::vector(width));
    }

    pub fn get_port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.name == name)
    }
}

fn fmt_interface_list<T>(
    f: &mut Formatter<'_>,
    level: usize,
    keyword: &str,
    items: &[T],
    mut item: impl FnMut(&T) -> String,
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    indent(f, level)?;
    writeln!(f, "{keyword} (")?;
    for (position, element) in items.iter().enumerate() {
        indent(f, level + 1)?;
        let separator = if position + 1 < items.len() { ";" } else { "" };
        writeln!(f, "{}{separator}", item(element))?;
    }
    indent(f, level)?;
    writeln!(f, ");")
}

fn fmt_generic(generic: &Generic) -> String {
    match &generic.default {
        Some(default) => format!("{:<width$}: {} := {default}", generic.name, generic.ty, width = NAME_COLUMN),
        None => format!("{:<width$}: {}", generic.name, generic.ty, width = NAME_COLUMN),
    }
}

fn fmt_port(port: &Port) -> String {
    format!("{:<width$}: {:<3} {}", port.name, port.direction.to_string(), port.ty, width = NAME_COLUMN)
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "entity {} is", self.name)?;
        fmt_interface_list(f, 1, "generic", &self.generics, fmt_generic)?;
        fmt_interface_list(f, 1, "port", &self.ports, fmt_port)?;
        writeln!(f, "end {};", self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Constant { name: String, ty: Ty, value: String },
    Type { name: String, definition: String },
    Signal { name: String, ty: Ty, init: Option<String> },
}

impl Decl {
    pub fn new_constant(name: &str, ty: Ty, value: &str) -> Decl {
        Decl::Constant { name: name.to_string(), ty, value: value.to_string() }
    }

    /// `type <name> is array (<range>) of <element>;`
    pub fn new_array_type(name: &str, range: &str, element: Ty) -> Decl {
        Decl::Type { name: name.to_string(), definition: format!("array ({range}) of {element}") }
    }

    pub fn new_signal(name: &str, ty: Ty) -> Decl {
        Decl::Signal { name: name.to_string(), ty, init: None }
    }

    pub fn new_signal_init(name: &str, ty: Ty, init: &str) -> Decl {
        Decl::Signal { name: name.to_string(), ty, init: Some(init.to_string()) }
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Decl::Constant { name, ty, value } => write!(f, "constant {name} : {ty} := {value};"),
            Decl::Type { name, definition } => write!(f, "type {name} is {definition};"),
            Decl::Signal { name, ty, init: None } => write!(f, "signal {name:<width$} : {ty};", width = SIGNAL_COLUMN),
            Decl::Signal { name, ty, init: Some(init) } => {
                write!(f, "signal {name:<width$} : {ty} := {init};", width = SIGNAL_COLUMN)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Association {
    pub formal: String,
    pub actual: String,
}

impl Display for Association {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:<width$}=> {}", self.formal, self.actual, width = NAME_COLUMN)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Unit {
    /// `entity <library>.<name>(<architecture>)`
    Entity { library: String, name: String, architecture: Option<String> },
    Component(String),
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Entity { library, name, architecture: Some(architecture) } => {
                write!(f, "entity {library}.{name}({architecture})")
            }
            Unit::Entity { library, name, architecture: None } => write!(f, "entity {library}.{name}"),
            Unit::Component(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub label: String,
    pub unit: Unit,
    pub generic_map: Vec<Association>,
    pub port_map: Vec<Association>,
}

impl Instance {
    pub fn new_entity(label: &str, library: &str, name: &str, architecture: Option<&str>) -> Instance {
        let unit = Unit::Entity {
            library: library.to_string(),
            name: name.to_string(),
            architecture: architecture.map(str::to_string),
        };
        Instance { label: label.to_string(), unit, generic_map: vec![], port_map: vec![] }
    }

    pub fn new_component(label: &str, name: &str) -> Instance {
        Instance {
            label: label.to_string(),
            unit: Unit::Component(name.to_string()),
            generic_map: vec![],
            port_map: vec![],
        }
    }

    pub fn add_generic(&mut self, formal: &str, actual: impl Into<String>) {
        self.generic_map.push(Association { formal: formal.to_string(), actual: actual.into() });
    }

    pub fn connect(&mut self, formal: &str, actual: impl Into<String>) {
        self.port_map.push(Association { formal: formal.to_string(), actual: actual.into() });
    }

    pub fn get_connection(&self, formal: &str) -> Option<&str> {
        self.port_map.iter().find(|assoc| assoc.formal == formal).map(|assoc| assoc.actual.as_str())
    }
}

fn fmt_map(f: &mut Formatter<'_>, level: usize, keyword: &str, map: &[Association], last: &str) -> fmt::Result {
    indent(f, level)?;
    writeln!(f, "{keyword} (")?;
    for (position, assoc) in map.iter().enumerate() {
        indent(f, level + 1)?;
        let separator = if position + 1 < map.len() { "," } else { "" };
        writeln!(f, "{assoc}{separator}")?;
    }
    indent(f, level)?;
    writeln!(f, "){last}")
}

impl Instance {
    fn fmt_at(&self, f: &mut Formatter<'_>, level: usize) -> fmt::Result {
        indent(f, level)?;
        writeln!(f, "{} : {}", self.label, self.unit)?;
        if !self.generic_map.is_empty() {
            fmt_map(f, level + 1, "generic map", &self.generic_map, "")?;
        }
        fmt_map(f, level + 1, "port map", &self.port_map, ";")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Choice {
    Value(u32),
    Others,
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Value(value) => write!(f, "{:<width$}", value, width = CHOICE_COLUMN),
            Choice::Others => write!(f, "{:<width$}", "others", width = CHOICE_COLUMN),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseArm {
    pub choice: Choice,
    pub body: Vec<Sequential>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Sequential {
    SignalAssign { target: String, value: String },
    VariableAssign { target: String, value: String },
    If { condition: String, then: Vec<Sequential>, otherwise: Vec<Sequential> },
    Case { selector: String, arms: Vec<CaseArm> },
    While { condition: String, body: Vec<Sequential> },
    Return(String),
}

impl Sequential {
    pub fn new_assign(target: impl Into<String>, value: impl Into<String>) -> Sequential {
        Sequential::SignalAssign { target: target.into(), value: value.into() }
    }

    pub fn new_var_assign(target: impl Into<String>, value: impl Into<String>) -> Sequential {
        Sequential::VariableAssign { target: target.into(), value: value.into() }
    }

    pub fn new_if(condition: impl Into<String>, then: Vec<Sequential>) -> Sequential {
        Sequential::If { condition: condition.into(), then, otherwise: vec![] }
    }

    pub fn new_if_else(condition: impl Into<String>, then: Vec<Sequential>, otherwise: Vec<Sequential>) -> Sequential {
        Sequential::If { condition: condition.into(), then, otherwise }
    }

    pub fn new_case(selector: impl Into<String>) -> Sequential {
        Sequential::Case { selector: selector.into(), arms: vec![] }
    }

    /// Appends an arm; does nothing unless `self` is a `case`.
    pub fn add_arm(&mut self, choice: Choice, body: Vec<Sequential>) {
        if let Sequential::Case { arms, .. } = self {
            arms.push(CaseArm { choice, body });
        }
    }

    fn inline(&self) -> Option<String> {
        match self {
            Sequential::SignalAssign { target, value } => Some(format!("{target} <= {value};")),
            Sequential::VariableAssign { target, value } => Some(format!("{target} := {value};")),
            Sequential::Return(value) => Some(format!("return {value};")),
            _ => None,
        }
    }

    fn fmt_at(&self, f: &mut Formatter<'_>, level: usize) -> fmt::Result {
        if let Some(line) = self.inline() {
            indent(f, level)?;
            return writeln!(f, "{line}");
        }
        match self {
            Sequential::If { condition, then, otherwise } => {
                indent(f, level)?;
                writeln!(f, "if {condition} then")?;
                fmt_sequence(f, level + 1, then)?;
                if !otherwise.is_empty() {
                    indent(f, level)?;
                    writeln!(f, "else")?;
                    fmt_sequence(f, level + 1, otherwise)?;
                }
                indent(f, level)?;
                writeln!(f, "end if;")
            }
            Sequential::Case { selector, arms } => {
                indent(f, level)?;
                writeln!(f, "case {selector} is")?;
                for arm in arms {
                    indent(f, level + 1)?;
                    match arm.body.as_slice() {
                        [single] if single.inline().is_some() => {
                            writeln!(f, "when {} => {}", arm.choice, single.inline().unwrap_or_default())?
                        }
                        body => {
                            writeln!(f, "when {} =>", arm.choice)?;
                            fmt_sequence(f, level + 2, body)?;
                        }
                    }
                }
                indent(f, level)?;
                writeln!(f, "end case;")
            }
            Sequential::While { condition, body } => {
                indent(f, level)?;
                writeln!(f, "while {condition} loop")?;
                fmt_sequence(f, level + 1, body)?;
                indent(f, level)?;
                writeln!(f, "end loop;")
            }
            _ => Ok(()),
        }
    }
}

fn fmt_sequence(f: &mut Formatter<'_>, level: usize, body: &[Sequential]) -> fmt::Result {
    for stmt in body {
        stmt.fmt_at(f, level)?;
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: Ty,
}

fn fmt_variables(f: &mut Formatter<'_>, level: usize, variables: &[Variable]) -> fmt::Result {
    for variable in variables {
        indent(f, level)?;
        writeln!(f, "variable {} : {};", variable.name, variable.ty)?;
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Process {
    pub sensitivity: Vec<String>,
    pub variables: Vec<Variable>,
    pub body: Vec<Sequential>,
}

impl Process {
    pub fn new(sensitivity: &[&str]) -> Process {
        Process { sensitivity: sensitivity.iter().map(|s| s.to_string()).collect(), variables: vec![], body: vec![] }
    }

    pub fn add_variable(&mut self, name: &str, ty: Ty) {
        self.variables.push(Variable { name: name.to_string(), ty });
    }

    pub fn add_seq(&mut self, stmt: Sequential) {
        self.body.push(stmt);
    }

    fn fmt_at(&self, f: &mut Formatter<'_>, level: usize) -> fmt::Result {
        indent(f, level)?;
        writeln!(f, "process ({})", self.sensitivity.join(", "))?;
        fmt_variables(f, level + 1, &self.variables)?;
        indent(f, level)?;
        writeln!(f, "begin")?;
        fmt_sequence(f, level + 1, &self.body)?;
        indent(f, level)?;
        writeln!(f, "end process;")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Instance(Instance),
    Assign { target: String, value: String },
    Process(Process),
}

impl Stmt {
    pub fn new_assign(target: impl Into<String>, value: impl Into<String>) -> Stmt {
        Stmt::Assign { target: target.into(), value: value.into() }
    }

    fn fmt_at(&self, f: &mut Formatter<'_>, level: usize) -> fmt::Result {
        match self {
            Stmt::Instance(instance) => instance.fmt_at(f, level),
            Stmt::Assign { target, value } => {
                indent(f, level)?;
                writeln!(f, "{target} <= {value};")
            }
            Stmt::Process(process) => process.fmt_at(f, level),
        }
    }
}

/// Architecture body. Statements are grouped in blocks that print separated
/// by a blank line.
#[derive(Clone, Debug, PartialEq)]
pub struct Architecture {
    pub name: String,
    pub entity: String,
    pub decls: Vec<Decl>,
    pub blocks: Vec<Vec<Stmt>>,
}

impl Architecture {
    pub fn new(name: &str, entity: &str) -> Architecture {
        Architecture { name: name.to_string(), entity: entity.to_string(), decls: vec![], blocks: vec![] }
    }

    pub fn add_decl(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    pub fn add_block(&mut self, block: Vec<Stmt>) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }
}

impl Display for Architecture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "architecture {} of {} is", self.name, self.entity)?;
        for decl in &self.decls {
            indent(f, 1)?;
            writeln!(f, "{decl}")?;
        }
        writeln!(f, "begin")?;
        for (position, block) in self.blocks.iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            for stmt in block {
                stmt.fmt_at(f, 1)?;
            }
        }
        writeln!(f, "end {};", self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, Ty)>,
    pub returns: Ty,
    pub variables: Vec<Variable>,
    pub body: Vec<Sequential>,
}

impl Function {
    fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|(name, ty)| format!("{name} : {ty}")).collect();
        format!("function {}({}) return {}", self.name, params.join("; "), self.returns)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Package {
    pub name: String,
    pub functions: Vec<Function>,
}

impl Display for Package {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "package {} is", self.name)?;
        for function in &self.functions {
            indent(f, 1)?;
            writeln!(f, "{};", function.signature())?;
        }
        writeln!(f, "end {};", self.name)?;
        writeln!(f)?;
        writeln!(f, "package body {} is", self.name)?;
        for function in &self.functions {
            indent(f, 1)?;
            writeln!(f, "{} is", function.signature())?;
            fmt_variables(f, 2, &function.variables)?;
            indent(f, 1)?;
            writeln!(f, "begin")?;
            fmt_sequence(f, 2, &function.body)?;
            indent(f, 1)?;
            writeln!(f, "end {};", function.name)?;
        }
        writeln!(f, "end {};", self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DesignUnit {
    Entity(Entity),
    Architecture(Architecture),
    Package(Package),
}

impl Display for DesignUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DesignUnit::Entity(entity) => entity.fmt(f),
            DesignUnit::Architecture(architecture) => architecture.fmt(f),
            DesignUnit::Package(package) => package.fmt(f),
        }
    }
}

/// A complete `.vhd` file: comment header, context clause, design units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DesignFile {
    pub header: Vec<String>,
    /// Library name and the units used from it, in order.
    pub context: Vec<(String, Vec<String>)>,
    pub units: Vec<DesignUnit>,
}

impl DesignFile {
    /// `library <library>;` (implicit for `WORK`) followed by one
    /// `use <library>.<unit>.all;` per unit.
    pub fn add_library(&mut self, library: &str, uses: &[&str]) {
        self.context.push((library.to_string(), uses.iter().map(|unit| unit.to_string()).collect()));
    }

    pub fn add_unit(&mut self, unit: DesignUnit) {
        self.units.push(unit);
    }
}

impl Display for DesignFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for line in &self.header {
            if line.is_empty() {
                writeln!(f, "--")?;
            } else {
                writeln!(f, "-- {line}")?;
            }
        }
        if !self.header.is_empty() {
            writeln!(f)?;
        }
        for (library, uses) in &self.context {
            if library != "WORK" {
                writeln!(f, "library {library};")?;
            }
            for unit in uses {
                writeln!(f, "use {library}.{unit}.all;")?;
            }
        }
        for unit in &self.units {
            writeln!(f)?;
            write!(f, "{unit}")?;
        }
        Ok(())
    }
}
