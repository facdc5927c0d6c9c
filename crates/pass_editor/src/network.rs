//! 默认网络模板
//!
//! 描述新建 PassManager 节点时内部网络的结构。
//! 模板只是纯数据，由宿主提供的 [`NetworkBuilder`](crate::NetworkBuilder)
//! 负责把它转换为真实节点。
//!
//! ```text
//!   in ──► Merge.i0
//!          Merge.i1 ◄── LocationCreate.out
//!          Merge.out ──► OpScript.i0
//!                        OpScript.out ──► out
//! ```

use serde::Serialize;

use crate::collaborators::ParamValue;

/// Pass 位置的场景图根路径
pub const PASSES_LOCATION_ROOT: &str = "/root/world/passes/";

/// OpScript `camera` 参数的默认相机
pub const DEFAULT_CAMERA: &str = "/root/world/cam/camera";

pub const MERGE_NODE: &str = "Merge";
pub const LOCATION_CREATE_NODE: &str = "LocationCreate";
pub const OPSCRIPT_NODE: &str = "OpScript";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Merge,
    LocationCreate,
    OpScript,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    pub name: String,
    pub kind: NodeKind,
    pub position: (f64, f64),
    pub input_ports: Vec<String>,
    /// 创建后设置的 `(参数路径, 表达式)`
    pub expressions: Vec<(String, String)>,
}

/// 连接的一端
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PortRef {
    /// 外层 Group 的输入端口（从内部看）
    GroupInput(String),
    /// 外层 Group 的输出端口（从内部看）
    GroupOutput(String),
    Node { node: String, port: String },
}

impl PortRef {
    fn node(node: &str, port: &str) -> Self {
        Self::Node {
            node: node.to_owned(),
            port: port.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from: PortRef,
    pub to: PortRef,
}

/// 用户参数的界面控件提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WidgetHint {
    CheckBox,
    Mapper(Vec<(String, i32)>),
    ScenegraphLocation,
    Cel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserParameter {
    pub name: String,
    pub default: ParamValue,
    pub widget: WidgetHint,
    pub constant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkTemplate {
    pub group_inputs: Vec<String>,
    pub group_outputs: Vec<String>,
    pub nodes: Vec<NodeSpec>,
    pub connections: Vec<Connection>,
    /// OpScript 节点 `user` 组下的参数
    pub user_parameters: Vec<UserParameter>,
}

impl NetworkTemplate {
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// 检查每条连接引用的端口都已声明
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let port_exists = |port: &PortRef, as_input: bool| match port {
            PortRef::GroupInput(name) => self.group_inputs.contains(name),
            PortRef::GroupOutput(name) => self.group_outputs.contains(name),
            PortRef::Node { node, port } => self.node(node).is_some_and(|n| {
                // 每个节点只有一个 `out`，输入端口需显式声明
                if as_input { n.input_ports.contains(port) } else { port == "out" }
            }),
        };
        self.connections
            .iter()
            .all(|c| port_exists(&c.from, false) && port_exists(&c.to, true))
    }
}

/// `pass_type` 对应的 Pass 场景图位置
#[must_use]
pub fn pass_location(pass_type: &str) -> String {
    format!("{PASSES_LOCATION_ROOT}{pass_type}")
}

fn cel_parameter(name: &str) -> UserParameter {
    UserParameter {
        name: name.to_owned(),
        default: ParamValue::String(String::new()),
        widget: WidgetHint::Cel,
        constant: false,
    }
}

/// 新建 PassManager 节点时的默认网络
#[must_use]
pub fn default_network() -> NetworkTemplate {
    let nodes = vec![
        NodeSpec {
            name: MERGE_NODE.to_owned(),
            kind: NodeKind::Merge,
            position: (0.0, -100.0),
            input_ports: vec!["i0".to_owned(), "i1".to_owned()],
            expressions: Vec::new(),
        },
        NodeSpec {
            name: LOCATION_CREATE_NODE.to_owned(),
            kind: NodeKind::LocationCreate,
            position: (200.0, -50.0),
            input_ports: Vec::new(),
            expressions: vec![(
                "locations.i0".to_owned(),
                format!("=\"{PASSES_LOCATION_ROOT}\" + ~/type"),
            )],
        },
        NodeSpec {
            name: OPSCRIPT_NODE.to_owned(),
            kind: NodeKind::OpScript,
            position: (0.0, -150.0),
            input_ports: vec!["i0".to_owned()],
            expressions: vec![("CEL".to_owned(), format!("={LOCATION_CREATE_NODE}/locations.i0"))],
        },
    ];

    let connections = vec![
        Connection {
            from: PortRef::GroupInput("in".to_owned()),
            to: PortRef::node(MERGE_NODE, "i0"),
        },
        Connection {
            from: PortRef::node(LOCATION_CREATE_NODE, "out"),
            to: PortRef::node(MERGE_NODE, "i1"),
        },
        Connection {
            from: PortRef::node(MERGE_NODE, "out"),
            to: PortRef::node(OPSCRIPT_NODE, "i0"),
        },
        Connection {
            from: PortRef::node(OPSCRIPT_NODE, "out"),
            to: PortRef::GroupOutput("out".to_owned()),
        },
    ];

    let user_parameters = vec![
        UserParameter {
            name: "renderQuality".to_owned(),
            default: ParamValue::Number(0.0),
            widget: WidgetHint::Mapper(vec![
                ("Low".to_owned(), 0),
                ("Medium".to_owned(), 1),
                ("High".to_owned(), 2),
            ]),
            constant: true,
        },
        UserParameter {
            name: "denoise".to_owned(),
            default: ParamValue::Number(0.0),
            widget: WidgetHint::CheckBox,
            constant: true,
        },
        UserParameter {
            name: "camera".to_owned(),
            default: ParamValue::String(DEFAULT_CAMERA.to_owned()),
            widget: WidgetHint::ScenegraphLocation,
            constant: false,
        },
        cel_parameter("VisibilityON"),
        cel_parameter("VisibilityOFF"),
        cel_parameter("Holdout"),
        cel_parameter("Prune"),
    ];

    NetworkTemplate {
        group_inputs: vec!["in".to_owned()],
        group_outputs: vec!["out".to_owned()],
        nodes,
        connections,
        user_parameters,
    }
}
