use std::time::Duration;

use anyhow::Context;
use nestview_core::*;
use nestview_list::*;
use nestview_workspace::*;
use web_time::Instant;

fn templates() -> anyhow::Result<TemplateCache> {
    let mut t = TemplateCache::new();
    t.register("header", Template::fixed(RowRole::Header, Vec3::new(0.3, 0.01, 0.03)))?;
    t.register("property", Template::fixed(RowRole::Plain, Vec3::new(0.3, 0.01, 0.02)))?;
    // Measured lazily, on first use.
    t.register(
        "number",
        Template::measured(RowRole::Number, || Vec3::new(0.3, 0.01, 0.02)),
    )?;
    Ok(t)
}

fn load_config() -> anyhow::Result<ListConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ListConfig::default().with_indent_step(0.015));
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: ListConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    config.validate()?;
    Ok(config)
}

fn scene() -> Vec<Node> {
    let transform = Node::component(2, "header", "Transform").with_children(vec![
        Node::property(3, "property", "m_LocalPosition", PropertyValue::Generic),
        Node::property(4, "property", "m_LocalRotation", PropertyValue::Generic),
    ]);
    let mut slots = vec![Node::array_size(11, "number", NodeId(10), 3)];
    slots.extend((0..3).map(|i| {
        Node::property(
            12 + i,
            "number",
            format!("m_Slots.Array.data[{i}]"),
            PropertyValue::Integer(i * 5),
        )
    }));
    let inventory = Node::component(5, "header", "Inventory").with_children(vec![
        Node::property(6, "property", "m_Owner", PropertyValue::Text("player".into())),
        Node::property(7, "number", "m_Gold", PropertyValue::Integer(250)),
        Node::property(8, "number", "m_Weight", PropertyValue::Float(12.5)),
        Node::property(10, "property", "m_Slots", PropertyValue::Generic).with_children(slots),
    ]);
    vec![Node::object(1, "header", "Chest").with_children(vec![transform, inventory])]
}

fn log_frame(label: &str, ws: &InspectorWorkspace, frame: &FrameSummary) {
    log::info!(
        "{label}: {} visible, content {:.3}, snap-back {:?}\n{}",
        frame.visible.len(),
        frame.content_extent,
        frame.snap_back,
        ws.list().describe()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = load_config()?;
    let mut host = WorkspaceHost::new();
    host.on_destroyed(|id| log::info!("workspace {id:?} destroyed"));

    let id = host.open(Box::new(InspectorWorkspace::new(config, templates()?, "number")?))?;
    let ws = host
        .get_mut::<InspectorWorkspace>(id)
        .context("inspector workspace missing after open")?;

    ws.inspect(scene())?;
    ws.list_mut()
        .set_highlight(|id, on| log::debug!("highlight {id} {on}"));
    let frame = ws.frame()?;
    log_frame("initial", ws, &frame);

    ws.list_mut().toggle_expanded(NodeId(10));
    let frame = ws.frame()?;
    log_frame("slots opened", ws, &frame);

    // Grow the array mid-drag, then drag far past the end. The size row is
    // carried over and the snap-back waits for the drag to finish.
    ws.list_mut().scroll_mut().begin_drag();
    ws.list_mut().submit_number(NodeId(11), "5");
    ws.list_mut().submit_number(NodeId(7), "not a number");
    ws.list_mut().scroll_by(-1.0);
    let frame = ws.frame()?;
    log_frame("resized past end", ws, &frame);

    ws.list_mut().scroll_mut().end_drag();
    let frame = ws.frame()?;
    log_frame("snapped back", ws, &frame);

    // A refresh keeps the collapsed Transform collapsed.
    ws.list_mut().toggle_expanded(NodeId(2));
    ws.inspect(scene())?;
    let frame = ws.frame()?;
    log_frame("refreshed", ws, &frame);
    log::info!("rows created: {}", ws.list().pool().created());

    // Back to the default expansion: objects and components open, the rest shut.
    ws.list_mut().reset_expansion();
    let frame = ws.frame()?;
    log_frame("expansion reset", ws, &frame);

    let mut placement = PlacementModule::new();
    placement.set_select(|o| log::info!("selected {o:?}"));
    let camera = Camera {
        position: Vec3::ZERO,
        field_of_view: 60.0,
    };
    let obj = Placeable {
        object: ObjectRef(1),
        position: Vec3::new(0.0, 0.0, 0.2),
        scale: Vec3::ZERO,
        unit_bounds: Some(host_bounds()),
    };
    placement.place_object(&obj, Vec3::ONE, &camera);
    let started = Instant::now();
    let step = Duration::from_millis(100);
    while !placement.active().is_empty() {
        for f in placement.update(step) {
            log::debug!("{:?} scale {:.2} at {:?}", f.object, f.scale.x, f.position);
        }
    }
    log::info!("placement stepped in {:?}", started.elapsed());

    let mut key = KeyboardButton::new("key").with_text_component();
    key.set_match_button_text(true);
    for entry in ["a", r"\u00", r"\t", " "] {
        let taken = key.enter_character(entry);
        log::info!("key entry {entry:?} taken={taken} -> {:?}", key.object_name);
    }

    host.close(id)?;
    Ok(())
}

fn host_bounds() -> Bounds {
    Bounds::new(Vec3::ZERO, Vec3::new(0.5, 0.5, 0.5))
}
