/// Diagnostic tool to exercise the tree → strategy → metrics pipeline
/// and the circular packing walk on a fixed synthetic hierarchy.
use canopy_layout::metrics::{self, LayoutSnapshot};
use canopy_layout::tree::arena::{NodeId, WeightTree, WeightedItem};
use canopy_layout::{
    build_tree, pack_group, pack_layout, repack_ancestors, BinaryTreeLayout, Circle, CircleTree,
    LayoutStrategy, OrderedPivotLayout, PackConfig, PackControl, PivotPolicy, Rect, SliceAndDice,
    SquarifiedLayout, WeightSource,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("canopy_layout=debug".parse().unwrap()),
        )
        .init();

    println!("=== DIAGNOSTIC: Tree → Layout → Metrics Pipeline ===");

    let source = demo_source();
    let mut tree = build_tree(&source);
    let leaves = tree
        .nodes
        .iter()
        .filter(|node| node.children.is_empty())
        .count();
    let total = tree.weight(tree.root);
    println!(
        "\n[1] Tree built: {} nodes ({} composites, {} leaves), total weight {:.1}",
        tree.len(),
        tree.len() - leaves,
        leaves,
        total
    );

    println!("\n[2] Top-level groups by weight:");
    let mut top: Vec<(NodeId, f64)> = Vec::new();
    for id in tree.children(tree.root).to_vec() {
        let weight = tree.weight(id);
        top.push((id, weight));
    }
    top.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (i, (id, weight)) in top.iter().enumerate() {
        let node = tree.get(*id);
        println!(
            "    [{}] '{}' - weight {:.1} ({} children)",
            i,
            node.label,
            weight,
            node.children.len()
        );
    }

    let viewport = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let slice = SliceAndDice::default();
    let binary = BinaryTreeLayout;
    let pivot = OrderedPivotLayout::new(PivotPolicy::Middle);
    let squarified = SquarifiedLayout;
    let strategies: [(&str, &dyn LayoutStrategy); 4] = [
        ("slice-and-dice", &slice),
        ("binary-tree", &binary),
        ("pivot-by-middle", &pivot),
        ("squarified", &squarified),
    ];

    println!("\n[3] Strategy sweep over a {:.0}x{:.0} viewport:", viewport.w, viewport.h);
    let root = tree.root;
    for (name, strategy) in strategies {
        tree.layout(strategy, root, viewport);
        let items = leaf_items(&tree);
        let covered: f64 = items.iter().map(|item| item.bounds.area()).sum();
        let coverage = covered / viewport.area() * 100.0;
        let average = metrics::average_aspect_ratio(&items);
        let worst = metrics::worst_aspect_ratio(&items);
        let readability = metrics::readability(&mut tree, root);
        println!(
            "    {:<16} coverage {:6.2}%  aspect avg {:5.2} / worst {:6.2}  readability {:.3}",
            name, coverage, average, worst, readability
        );
    }

    println!("\n[4] Top 8 leaf rectangles by area (squarified):");
    let mut biggest: Vec<(&str, Rect)> = tree
        .nodes
        .iter()
        .filter(|node| node.children.is_empty())
        .map(|node| (node.label.as_str(), node.item.bounds))
        .collect();
    biggest.sort_by(|a, b| b.1.area().total_cmp(&a.1.area()));
    for (i, (label, rect)) in biggest.iter().take(8).enumerate() {
        println!(
            "    [{}] '{}' - {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1})",
            i,
            label,
            rect.w,
            rect.h,
            rect.area(),
            rect.x,
            rect.y
        );
    }

    println!("\n[5] Checking for anomalies:");
    let degenerate = tree
        .nodes
        .iter()
        .filter(|node| {
            let b = node.item.bounds;
            !(b.x.is_finite() && b.y.is_finite() && b.w.is_finite() && b.h.is_finite())
                || b.w < 0.0
                || b.h < 0.0
        })
        .count();
    let covered: f64 = leaf_items(&tree).iter().map(|item| item.bounds.area()).sum();
    println!("    Non-finite or negative extents: {}", degenerate);
    println!(
        "    Leaf area {:.0}px² of {:.0}px² viewport ({:.2}% coverage)",
        covered,
        viewport.area(),
        covered / viewport.area() * 100.0
    );

    println!("\n[6] Stability after a 10% weight bump on 'foliage.ktx':");
    let bumped = find_node(&tree, "foliage.ktx");
    let original = tree.weight(bumped);
    let comparison: [(&str, &dyn LayoutStrategy); 2] =
        [("binary-tree", &binary), ("squarified", &squarified)];
    for (name, strategy) in comparison {
        tree.layout(strategy, tree.root, viewport);
        let before = LayoutSnapshot::capture(&tree, tree.root);
        tree.set_weight(bumped, original * 1.1);
        tree.layout(strategy, tree.root, viewport);
        let after = LayoutSnapshot::capture(&tree, tree.root);
        let drift = metrics::stability(&before, &after)?;
        println!("    {:<16} mean rectangle drift {:8.3}px", name, drift);
        tree.set_weight(bumped, original);
    }

    println!("\n[7] Circular packing:");
    let mut circles = CircleTree::from_source(&source);
    let config = PackConfig::default();
    let mut progress = |done: usize, total: usize| -> PackControl {
        println!("    placed {}/{} nodes", done, total);
        PackControl::Continue
    };
    let status = pack_layout(&mut circles, &config, &mut progress);
    println!("    status: {:?}", status);
    println!(
        "    root radius {:.2} for {} circles",
        circles.get(circles.root).circle.r,
        circles.len()
    );

    let absolute = circles.absolute();
    let mut placed = vec![Circle::ZERO; circles.len()];
    for (id, circle) in &absolute {
        placed[id.index()] = *circle;
    }
    let escapes = absolute
        .iter()
        .filter(|(id, circle)| match circles.get(*id).parent {
            Some(parent) => !placed[parent.index()].contains_with(circle, 1e-5),
            None => false,
        })
        .count();
    println!("    children escaping their parent: {}", escapes);

    println!("\n[8] Repack after quadrupling 'water.ktx':");
    let edited = find_circle(&circles, "water.ktx");
    circles.get_mut(edited).weight *= 4.0;
    pack_group(&mut circles, edited, &config);
    repack_ancestors(&mut circles, edited, &config);
    println!(
        "    leaf radius {:.2}, root radius now {:.2}",
        circles.get(edited).circle.r,
        circles.get(circles.root).circle.r
    );

    Ok(())
}

fn demo_source() -> WeightSource {
    WeightSource::group(
        "repo",
        vec![
            WeightSource::group(
                "src",
                vec![
                    WeightSource::leaf("parser.rs", 96.4),
                    WeightSource::leaf("codegen.rs", 144.9),
                    WeightSource::leaf("lexer.rs", 38.2),
                    WeightSource::leaf("main.rs", 7.1),
                ],
            ),
            WeightSource::group(
                "assets",
                vec![
                    WeightSource::group(
                        "textures",
                        vec![
                            WeightSource::leaf("terrain.ktx", 512.0),
                            WeightSource::leaf("foliage.ktx", 256.0),
                            WeightSource::leaf("water.ktx", 128.0),
                        ],
                    ),
                    WeightSource::group(
                        "audio",
                        vec![
                            WeightSource::leaf("ambience.ogg", 96.0),
                            WeightSource::leaf("ui-clicks.ogg", 4.5),
                        ],
                    ),
                    WeightSource::leaf("icons.atlas", 64.0),
                ],
            ),
            WeightSource::group(
                "vendor",
                vec![
                    WeightSource::leaf("physics.a", 402.0),
                    WeightSource::leaf("net.a", 230.0),
                ],
            ),
            WeightSource::leaf("README.md", 1.2),
        ],
    )
}

fn leaf_items(tree: &WeightTree) -> Vec<WeightedItem> {
    tree.nodes
        .iter()
        .filter(|node| node.children.is_empty())
        .map(|node| node.item)
        .collect()
}

fn find_node(tree: &WeightTree, label: &str) -> NodeId {
    NodeId(
        tree.nodes
            .iter()
            .position(|node| node.label.as_str() == label)
            .expect("label present in the demo tree") as u32,
    )
}

fn find_circle(tree: &CircleTree, label: &str) -> NodeId {
    NodeId(
        tree.nodes
            .iter()
            .position(|node| node.label.as_str() == label)
            .expect("label present in the demo tree") as u32,
    )
}
