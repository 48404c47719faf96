//! End-to-end scenarios for the analysis engine and its projections.

use rstest::{fixture, rstest};
use serde_json::json;
use tokenweave::Error;
use tokenweave::analysis::{DependencyAnalyzer, ImpactLevel, ValidationWarningKind};
use tokenweave::config::AnalysisConfig;
use tokenweave::domain::{TokenId, TokenSystem};
use tokenweave::transform::{
    ChordNodeType, ChordTransformer, EdgeType, GraphTransformer, NodeType, TransformInput,
    TransformerRegistry, VisualizationData,
};

mod common;
use common::{alias, literal, system};

fn id(s: &str) -> TokenId {
    TokenId::from(s)
}

fn ids(list: &[&str]) -> Vec<TokenId> {
    list.iter().map(|s| id(s)).collect()
}

// ============================================================================
// Fixtures
// ============================================================================

/// a -> b -> c, c literal
#[fixture]
fn chain() -> TokenSystem {
    system(vec![alias("a", "b"), alias("b", "c"), literal("c", json!("#fff"))])
}

/// a -> b -> c -> a
#[fixture]
fn three_cycle() -> TokenSystem {
    system(vec![alias("a", "b"), alias("b", "c"), alias("c", "a")])
}

// ============================================================================
// Dependency analysis
// ============================================================================

#[rstest]
fn chain_depths_edges_and_shape(chain: TokenSystem) {
    let analysis = DependencyAnalyzer::default().analyze(&chain).unwrap();

    assert_eq!(analysis.depth_of(&id("a")), Some(2));
    assert_eq!(analysis.depth_of(&id("b")), Some(1));
    assert_eq!(analysis.depth_of(&id("c")), Some(0));
    assert_eq!(analysis.complexity.total_references, 2);
    assert_eq!(analysis.complexity.max_depth, 2);
    assert_eq!(analysis.root_tokens, ids(&["c"]));
    assert_eq!(analysis.leaf_tokens, ids(&["a"]));
    assert!(analysis.isolated_tokens.is_empty());
    assert!(analysis.circular_dependencies.is_empty());

    let c = analysis.token(&id("c")).unwrap();
    assert_eq!(c.blast_radius.directly_affected, ids(&["b"]));
    assert_eq!(c.blast_radius.indirectly_affected, ids(&["a"]));
    assert_eq!(c.blast_radius.estimated_impact, ImpactLevel::Low);

    assert!(analysis.validation.is_valid);
    let unused: Vec<_> = analysis
        .validation
        .warnings_of(ValidationWarningKind::UnusedToken)
        .map(|w| w.token_id.clone())
        .collect();
    assert_eq!(unused, ids(&["a"]));

    let graph = GraphTransformer::new().build(&chain, &analysis);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.edges[0].id, "a->b");
    assert!(graph.edges.iter().all(|e| e.edge_type == EdgeType::Direct));
    assert_eq!(graph.statistics.deepest_token.as_ref().unwrap().token_id, id("a"));
}

#[test]
fn missing_reference_is_one_error_and_no_edge() {
    let system = system(vec![alias("x", "y")]);
    let analysis = DependencyAnalyzer::default().analyze(&system).unwrap();

    assert!(!analysis.validation.is_valid);
    assert_eq!(analysis.validation.errors.len(), 1);
    let error = &analysis.validation.errors[0];
    assert_eq!(error.token_id, id("x"));
    assert_eq!(error.referenced_id, Some(id("y")));
    assert_eq!(error.kind.as_str(), "missing_reference");
    assert_eq!(analysis.depth_of(&id("x")), Some(1));

    let graph = GraphTransformer::new().build(&system, &analysis);
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].node_type, NodeType::Alias);
    assert!(graph.edges.is_empty());
}

#[test]
fn empty_system_is_valid_and_degenerate() {
    let system = TokenSystem::from_json(r#"{ "tokens": [] }"#).unwrap();
    let analysis = DependencyAnalyzer::default().analyze(&system).unwrap();

    assert_eq!(analysis.total_tokens, 0);
    assert!(analysis.validation.is_valid);
    assert_eq!(analysis.complexity.max_depth, 0);
    assert!(analysis.complexity.average_depth.abs() < f64::EPSILON);

    let graph = GraphTransformer::new().build(&system, &analysis);
    assert!(graph.nodes.is_empty());
    assert!(graph.statistics.most_referenced.is_none());

    let chord = ChordTransformer::default().build(&system);
    assert_eq!(chord.nodes.len(), 1);
    assert_eq!(chord.nodes[0].node_type, ChordNodeType::Aggregate);
    assert_eq!(chord.matrix, vec![vec![0.0]]);
}

#[rstest]
fn three_cycle_is_reported_once(three_cycle: TokenSystem) {
    let analysis = DependencyAnalyzer::default().analyze(&three_cycle).unwrap();

    assert_eq!(analysis.circular_dependencies.len(), 1);
    let cycle = &analysis.circular_dependencies[0];
    assert_eq!(cycle.path, ids(&["a", "b", "c"]));
    assert_eq!(cycle.description, "Circular dependency: a -> b -> c -> a");

    for token in ["a", "b", "c"] {
        let info = analysis.token(&id(token)).unwrap();
        assert_eq!(info.depth, 0, "depth of {token}");
        assert!(info.is_circular);
        assert_eq!(info.circular_paths.len(), 1);
    }
    assert_eq!(analysis.complexity.circular_token_count, 3);
    assert!(!analysis.validation.is_valid);
    assert!(analysis.validation.errors.is_empty());

    let graph = GraphTransformer::new().build(&three_cycle, &analysis);
    assert!(graph.nodes.iter().all(|n| n.node_type == NodeType::Circular));
    assert!(graph.edges.iter().all(|e| e.edge_type == EdgeType::Circular));
}

#[test]
fn token_aliasing_a_cycle_is_not_circular() {
    let system = system(vec![alias("a", "b"), alias("b", "a"), alias("entry", "a")]);
    let analysis = DependencyAnalyzer::default().analyze(&system).unwrap();

    let entry = analysis.token(&id("entry")).unwrap();
    assert!(!entry.is_circular);
    assert!(entry.circular_paths.is_empty());
    assert_eq!(analysis.circular_dependencies.len(), 1);
}

#[test]
fn per_mode_aliases_form_a_diamond() {
    let system = TokenSystem::from_json(
        &json!({
            "tokens": [
                {
                    "id": "top",
                    "resolvedValueTypeId": "color",
                    "valuesByMode": [
                        { "modeIds": ["light"], "value": { "tokenId": "left" } },
                        { "modeIds": ["dark"], "value": { "tokenId": "right" } }
                    ]
                },
                alias("left", "base"),
                alias("right", "base"),
                literal("base", json!("#000"))
            ]
        })
        .to_string(),
    )
    .unwrap();
    let analysis = DependencyAnalyzer::default().analyze(&system).unwrap();

    assert_eq!(analysis.depth_of(&id("top")), Some(2));
    let base = analysis.token(&id("base")).unwrap();
    assert_eq!(base.dependents, ids(&["left", "right"]));
    assert_eq!(base.blast_radius.indirectly_affected, ids(&["top"]));

    let graph = GraphTransformer::new().build(&system, &analysis);
    let top_edges: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.source == id("top"))
        .collect();
    assert_eq!(top_edges.len(), 2);
    assert_eq!(top_edges[0].mode_ids.len(), 1);
}

#[test]
fn duplicate_ids_are_rejected_before_analysis() {
    let system = system(vec![literal("a", json!(1)), literal("a", json!(2))]);
    let err = DependencyAnalyzer::default().analyze(&system).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn analyzer_does_not_reuse_depths_across_systems() {
    let analyzer = DependencyAnalyzer::default();

    let chained = system(vec![
        alias("t2", "t1"),
        alias("t1", "t0"),
        literal("t0", json!(0)),
    ]);
    let first = analyzer.analyze(&chained).unwrap();
    assert_eq!(first.depth_of(&id("t2")), Some(2));

    let flattened = system(vec![
        literal("t2", json!(1)),
        alias("t1", "t0"),
        literal("t0", json!(0)),
    ]);
    let second = analyzer.analyze(&flattened).unwrap();
    assert_eq!(second.depth_of(&id("t2")), Some(0));
    assert_eq!(second.depth_of(&id("t1")), Some(1));
    assert!(second.complexity.max_depth < first.complexity.max_depth);

    let fresh = DependencyAnalyzer::default().analyze(&flattened).unwrap();
    assert_eq!(second, fresh);
}

#[test]
fn mode_id_reused_across_dimensions_is_rejected() {
    let system = TokenSystem::from_json(
        &json!({
            "tokens": [],
            "dimensions": [
                { "id": "theme", "modes": [{ "id": "default", "name": "Default" }] },
                { "id": "density", "modes": [{ "id": "default", "name": "Default" }] }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let err = DependencyAnalyzer::default().analyze(&system).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("default")));
}

#[test]
fn deep_nesting_threshold_comes_from_config() {
    let system = system(vec![
        alias("a", "b"),
        alias("b", "c"),
        alias("c", "d"),
        literal("d", json!(0)),
    ]);
    let config = AnalysisConfig {
        deep_nesting_threshold: 2,
        ..AnalysisConfig::default()
    };
    let analysis = DependencyAnalyzer::new(config).analyze(&system).unwrap();

    let deep: Vec<_> = analysis
        .validation
        .warnings_of(ValidationWarningKind::DeepNesting)
        .map(|w| w.token_id.clone())
        .collect();
    assert_eq!(deep, ids(&["a"]));
    assert!(analysis.validation.is_valid);
}

#[rstest]
#[case(5, ImpactLevel::Low)]
#[case(6, ImpactLevel::Medium)]
#[case(10, ImpactLevel::Medium)]
#[case(11, ImpactLevel::High)]
fn impact_follows_direct_dependent_count(#[case] dependents: usize, #[case] expected: ImpactLevel) {
    let mut tokens = vec![literal("hub", json!("#123456"))];
    tokens.extend((0..dependents).map(|i| alias(&format!("t{i}"), "hub")));
    let analysis = DependencyAnalyzer::default()
        .analyze(&system(tokens))
        .unwrap();

    let hub = analysis.token(&id("hub")).unwrap();
    assert_eq!(hub.usage_count, dependents);
    assert_eq!(hub.blast_radius.estimated_impact, expected);
    assert_eq!(analysis.most_referenced[0].token_id, id("hub"));
}

#[test]
fn most_referenced_respects_limit_and_ties() {
    let system = system(vec![
        literal("x", json!(1)),
        literal("y", json!(2)),
        literal("z", json!(3)),
        alias("a1", "y"),
        alias("a2", "y"),
        alias("a3", "x"),
        alias("a4", "z"),
    ]);
    let config = AnalysisConfig {
        most_referenced_limit: 2,
        ..AnalysisConfig::default()
    };
    let analysis = DependencyAnalyzer::new(config).analyze(&system).unwrap();

    let top: Vec<_> = analysis
        .most_referenced
        .iter()
        .map(|u| (u.token_id.as_str(), u.usage_count))
        .collect();
    assert_eq!(top, vec![("y", 2), ("x", 1)]);
}

// ============================================================================
// Projections
// ============================================================================

#[rstest]
fn registry_routes_both_projections(chain: TokenSystem) {
    let analysis = DependencyAnalyzer::default().analyze(&chain).unwrap();
    let input = TransformInput {
        system: &chain,
        analysis: &analysis,
    };
    let registry = TransformerRegistry::default();

    let graph = registry.transform("dependency-graph", &input).unwrap();
    let VisualizationData::DependencyGraph(graph) = graph else {
        panic!("expected a dependency graph");
    };
    assert_eq!(graph.nodes.len(), 3);

    let chord = registry.transform("chord-diagram", &input).unwrap();
    assert!(matches!(chord, VisualizationData::ChordDiagram(_)));

    let err = registry.transform("sankey", &input).unwrap_err();
    assert!(matches!(err, Error::UnknownVisualization(_)));
}

#[test]
fn visualization_data_serializes_with_type_tag() {
    let system = system(vec![literal("a", json!(1))]);
    let analysis = DependencyAnalyzer::default().analyze(&system).unwrap();
    let input = TransformInput {
        system: &system,
        analysis: &analysis,
    };
    let data = TransformerRegistry::default()
        .transform("dependency-graph", &input)
        .unwrap();

    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value["type"], "dependency-graph");
    assert_eq!(value["data"]["nodes"][0]["id"], "a");
    assert_eq!(value["data"]["statistics"]["totalTokens"], 1);
}

#[test]
fn chord_projection_over_modes_and_platforms() {
    let system = TokenSystem::from_json(
        &json!({
            "tokens": [
                {
                    "id": "bg",
                    "resolvedValueTypeId": "color",
                    "valuesByMode": [
                        { "modeIds": ["light"], "value": "#fff" },
                        { "modeIds": ["dark"], "value": "#000" }
                    ]
                },
                {
                    "id": "fg",
                    "resolvedValueTypeId": "color",
                    "valuesByMode": [
                        { "modeIds": ["light"], "value": "#000" },
                        { "modeIds": ["dark"], "value": "#fff" }
                    ]
                }
            ],
            "dimensions": [
                {
                    "id": "theme",
                    "displayName": "Theme",
                    "modes": [
                        { "id": "light", "name": "Light" },
                        { "id": "dark", "name": "Dark" }
                    ]
                }
            ],
            "platforms": [{ "id": "ios", "displayName": "iOS" }],
            "platformOverrides": [
                { "platformId": "ios", "tokenId": "bg", "value": "#fafafa" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let chord = ChordTransformer::default().build(&system);

    let node_ids: Vec<_> = chord.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(node_ids, vec!["mode:light", "mode:dark", "platform:ios"]);
    assert_eq!(chord.mode_analysis.conflict_matrix, vec![vec![0, 2], vec![2, 0]]);
    assert_eq!(chord.mode_analysis.modes[0].tokens_defined, 2);
    assert!(chord.mode_analysis.couplings.is_empty());

    let ios = &chord.platform_analysis.platforms[0];
    assert_eq!(ios.affected_token_ids, ids(&["bg"]));
    assert!((ios.deviation_score - 0.5).abs() < f64::EPSILON);

    for (i, row) in chord.matrix.iter().enumerate() {
        assert_eq!(row.len(), chord.nodes.len());
        for (j, value) in row.iter().enumerate() {
            assert!((value - chord.matrix[j][i]).abs() < f64::EPSILON);
        }
    }
}
