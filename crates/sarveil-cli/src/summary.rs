use console::Style;
use sarveil_core::geo::Region;
use sarveil_core::pipeline::{PipelineConfig, RunOutput};
use sarveil_core::scene::{BasemapRecord, SceneRecord};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

fn print_region(s: &Styles, region: &Region) {
    let [east, south, west, north] = region.frame_extent.eswn();
    println!(
        "    {:<12}{}",
        s.label.apply_to("Center"),
        s.value
            .apply_to(format!("{:.5}, {:.5}", region.center.0, region.center.1))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Buffer"),
        s.value
            .apply_to(format!("{:.0} m", region.buffer_radius_meters))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Extent"),
        s.value.apply_to(format!(
            "E {east:.4}  S {south:.4}  W {west:.4}  N {north:.4}"
        ))
    );
}

fn print_basemap(s: &Styles, basemap: Option<&BasemapRecord>) {
    match basemap {
        Some(basemap) => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Basemap"),
                s.method.apply_to(&basemap.scene.id)
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Acquired"),
                s.value.apply_to(basemap.scene.date_label())
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Window"),
                s.value
                    .apply_to(format!("{} days", basemap.search_window_days))
            );
            if let Some(cloud) = basemap.cloud_percentage {
                println!(
                    "    {:<12}{}",
                    s.label.apply_to("Cloud"),
                    s.value.apply_to(format!("{cloud:.2}%"))
                );
            }
        }
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Basemap"),
            s.disabled.apply_to("unavailable (overlay only)")
        ),
    }
}

pub fn print_run_summary(config: &PipelineConfig, output: &RunOutput) {
    let s = Styles::new();
    print_title(&s, "SAR Change Animation");

    println!(
        "  {:<14}{}",
        s.label.apply_to("POI"),
        s.value.apply_to(&config.poi.name)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Mode"),
        s.method.apply_to(config.mode)
    );
    println!();

    println!("  {}", s.header.apply_to("Region"));
    print_region(&s, &output.region);
    println!();

    println!("  {}", s.header.apply_to("Basemap"));
    print_basemap(&s, output.basemap.as_ref());
    println!();

    println!("  {}", s.header.apply_to("Animation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(output.window)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(output.sequence.len())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Playback"),
        s.method.apply_to(&config.animation)
    );
    println!();
}

pub fn print_scene_table(region: &Region, scenes: &[SceneRecord]) {
    let s = Styles::new();
    print_title(&s, "SAR Scenes");
    print_region(&s, region);
    println!();

    println!(
        "  {:>5}  {:<12}{:<8}{:<12}{}",
        s.header.apply_to("#"),
        s.header.apply_to("Date"),
        s.header.apply_to("Sat"),
        s.header.apply_to("Pass"),
        s.header.apply_to("Scene")
    );
    for scene in scenes {
        let platform = scene
            .platform
            .as_deref()
            .map(|p| format!("S-1{p}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>5}  {:<12}{:<8}{:<12}{}",
            s.label.apply_to(scene.sequence_index),
            s.value.apply_to(scene.date_label()),
            s.method.apply_to(platform),
            s.value.apply_to(scene.orbit_pass.as_deref().unwrap_or("-")),
            scene.id
        );
    }
    println!();
}

pub fn print_basemap_summary(region: &Region, basemap: Option<&BasemapRecord>) {
    let s = Styles::new();
    print_title(&s, "Basemap Search");
    print_region(&s, region);
    print_basemap(&s, basemap);
    println!();
}
