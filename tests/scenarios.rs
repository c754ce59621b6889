use orderdag::graph::{describe_cycles, sort, GraphBuilder};
use orderdag::ordering::{resolve, LoadedAssemblies, OrderedCallbackCollection};
use orderdag::errors::OrderError;
use orderdag::types::OnCycle;
use orderdag::units::{
    AssemblyUnit, CallbackUnit, OrderingRule, PackageMap, PlatformFilter, PluginExceptions,
};
use orderdag_test_utils::init_tracing;

fn unit(ty: &str) -> CallbackUnit {
    CallbackUnit::new(ty, "Run", "Game")
}

fn after(ty: &str, dep: &str) -> CallbackUnit {
    unit(ty).with_rule(OrderingRule::RunAfterClass(dep.into()))
}

#[test]
fn chain_of_after_rules() {
    init_tracing();
    let ordered = resolve(
        &GraphBuilder::new(),
        vec![unit("A"), after("B", "A"), after("C", "B")],
        OnCycle::Warn,
        "callbacks",
    )
    .unwrap();

    assert!(ordered.success());
    assert_eq!(ordered.order_names(), vec!["A.Run", "B.Run", "C.Run"]);
}

#[test]
fn mutual_after_rules_order_nothing() {
    init_tracing();
    let ordered = resolve(
        &GraphBuilder::new(),
        vec![after("A", "B"), after("B", "A")],
        OnCycle::Warn,
        "callbacks",
    )
    .unwrap();

    assert!(!ordered.success());
    assert!(ordered.order_names().is_empty());
    assert_eq!(ordered.unresolved_names(), vec!["A.Run", "B.Run"]);
}

#[test]
fn two_cycle_with_three_independent_nodes() {
    init_tracing();
    let ordered = resolve(
        &GraphBuilder::new(),
        vec![
            unit("X"),
            after("A", "B"),
            unit("Y"),
            after("B", "A"),
            unit("Z"),
        ],
        OnCycle::Warn,
        "callbacks",
    )
    .unwrap();

    assert!(!ordered.success());
    assert_eq!(ordered.order_names(), vec!["X.Run", "Y.Run", "Z.Run"]);
    assert_eq!(ordered.unresolved_names(), vec!["A.Run", "B.Run"]);

    let report = ordered.cycle_report();
    assert!(report.contains("2 of 5 nodes"));
    assert!(report.contains("A.Run"));
    assert!(report.contains("B.Run"));
    assert!(!report.contains("X.Run"));
}

#[test]
fn before_rules_mirror_after_rules() {
    let before = vec![
        unit("A").with_rule(OrderingRule::RunBeforeClass("B".into())),
        unit("B").with_rule(OrderingRule::RunBeforeClass("C".into())),
        unit("C"),
    ];
    let after_rules = vec![unit("A"), after("B", "A"), after("C", "B")];

    let g1 = GraphBuilder::new().build(before).unwrap();
    let g2 = GraphBuilder::new().build(after_rules).unwrap();
    assert_eq!(sort(&g1), sort(&g2));
}

#[test]
fn callbacks_can_run_before_a_whole_package() {
    let mut packages = PackageMap::new();
    packages.insert("Vendor.Runtime", "com.vendor.sdk");
    packages.insert("Vendor.Editor", "com.vendor.sdk");

    let mut collection = OrderedCallbackCollection::new(
        vec![
            CallbackUnit::new("Vendor.Boot", "Init", "Vendor.Runtime"),
            CallbackUnit::new("Vendor.Menu", "Init", "Vendor.Editor"),
            CallbackUnit::new("Studio.Setup", "Init", "Studio.Editor")
                .with_rule(OrderingRule::RunBeforePackage("com.vendor.sdk".into())),
            CallbackUnit::new("Studio.Late", "Init", "Studio.Editor")
                .with_rule(OrderingRule::RunAfterAssembly("Vendor.Editor".into())),
        ],
        packages,
    );

    let ordered = collection.sorted().unwrap();
    assert!(ordered.success());
    assert_eq!(
        ordered.order_names(),
        vec![
            "Studio.Setup.Init",
            "Vendor.Boot.Init",
            "Vendor.Menu.Init",
            "Studio.Late.Init",
        ]
    );
}

#[test]
fn rules_on_own_assembly_do_not_stall() {
    let ordered = resolve(
        &GraphBuilder::new(),
        vec![
            unit("A").with_rule(OrderingRule::RunAfterAssembly("Game".into())),
            unit("B"),
        ],
        OnCycle::Warn,
        "callbacks",
    )
    .unwrap();

    // A waits for every other callback in its assembly, but not for itself.
    assert!(ordered.success());
    assert_eq!(ordered.order_names(), vec!["B.Run", "A.Run"]);
}

#[test]
fn platform_specific_assemblies_are_skipped() {
    init_tracing();
    let filter = PlatformFilter::new(Some("Linux".to_string()), &["**/Tests/**"]).unwrap();
    let mut set = LoadedAssemblies::new(
        vec![
            AssemblyUnit::new("Engine"),
            AssemblyUnit::new("Native.Win").with_platforms(["Windows"]),
            AssemblyUnit::new("Native.Linux").with_platforms(["Linux"]),
            AssemblyUnit::new("Game.Tests")
                .with_path("Assets/Tests/Game.Tests.dll")
                .with_references(["Game"]),
            AssemblyUnit::new("Game").with_references(["Engine", "Native.Win", "Native.Linux"]),
        ],
        filter,
        PluginExceptions::none(),
        OnCycle::Warn,
    );

    let ordered = set.sorted().unwrap();
    assert_eq!(ordered.order_names(), vec!["Engine", "Native.Linux", "Game"]);
}

#[test]
fn cycle_report_matches_graph_outcome() {
    let graph = GraphBuilder::new()
        .build(vec![
            AssemblyUnit::new("A").with_references(["B"]),
            AssemblyUnit::new("B").with_references(["C"]),
            AssemblyUnit::new("C").with_references(["A"]),
            AssemblyUnit::new("D"),
        ])
        .unwrap();
    let outcome = sort(&graph);
    let report = describe_cycles(&graph, &outcome);

    assert_eq!(outcome.unresolved().len(), 3);
    assert_eq!(report.matches("<-- cycle").count(), 1);
    assert!(!report.contains('D'));
}

#[test]
fn strict_mode_names_every_cycle() {
    init_tracing();
    let result = resolve(
        &GraphBuilder::new(),
        vec![
            after("A", "B"),
            after("B", "A"),
            after("C", "D"),
            after("D", "C"),
            unit("E"),
        ],
        OnCycle::Error,
        "callbacks",
    );

    match result {
        Err(OrderError::DagCycle(msg)) => {
            for name in ["A.Run", "B.Run", "C.Run", "D.Run"] {
                assert!(msg.contains(name), "{name} missing from {msg}");
            }
            assert!(!msg.contains("E.Run"));
            assert_eq!(msg.matches("<-- cycle").count(), 2);
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
