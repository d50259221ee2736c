// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::graph::{FieldValue, GraphEdge, GraphModel, GraphNode};
use super::ids::NodeId;
use super::tree::{TreeModel, TreeNode};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn process(id: &str, name: &str, pid: i64, port: i64, connections: i64, notifications: i64) -> TreeNode {
    let mut node = TreeNode::new(nid(id), name);
    node.fields_mut().insert("pid".to_owned(), FieldValue::Int(pid));
    node.fields_mut().insert("port".to_owned(), FieldValue::Int(port));
    node.fields_mut()
        .insert("connections".to_owned(), FieldValue::Int(connections));
    node.fields_mut()
        .insert("notificationCount".to_owned(), FieldValue::Int(notifications));
    node
}

/// The demo topology graph: three servers, two links off `servera`.
pub fn server_graph() -> GraphModel {
    GraphModel::from_parts(
        vec![
            (
                nid("servera"),
                GraphNode::new_with("server-a.example.com", Some("default".to_owned())),
            ),
            (
                nid("serverb"),
                GraphNode::new_with("server-b.example.com", Some("default".to_owned())),
            ),
            (
                nid("serverc"),
                GraphNode::new_with("server-c.example.com", Some("default".to_owned())),
            ),
        ],
        vec![
            GraphEdge::new(nid("servera"), nid("serverb")),
            GraphEdge::new(nid("servera"), nid("serverc")),
        ],
    )
    .expect("server graph fixture")
}

/// The demo process tree rooted at an Apache front end.
pub fn process_tree() -> TreeModel {
    let mut root = process("apache1", "Apache", 3476, 80, 123, 10);

    let mut postgres = process("postgres1", "PostgreSQL", 7689, 5432, 5, 6);
    postgres.push_child(process("apache2", "Apache", 9876, 80, 3, 20));
    postgres.push_child(process("tomcat1", "Tomcat", 2243, 8081, 10, 1));

    root.push_child(postgres);
    root.push_child(process("mariadb1", "MariaDB", 678, 3306, 3, 12));
    root.push_child(process("iis1", "IIS", 1233, 8080, 1, 2));

    TreeModel::new(root).expect("process tree fixture")
}
