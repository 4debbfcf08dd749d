mod app;
mod effects;
mod gpu;
mod input;
mod lever;
mod settings;
pub mod ui;

use fruitspin_core::error::FruitspinError;
use fruitspin_sim::RoundCoordinator;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const CANVAS_ID: &str = "fruitspin-canvas";

/// WASM entry point. Installs the panic hook and console logger.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("logger init failed");
    log::info!("Fruitspin starting...");

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            show_error_to_user(&format!("{e}"));
        }
    });
}

/// Load game data, size the canvas, bring up WebGPU and start the frame loop.
#[cfg(target_arch = "wasm32")]
async fn run() -> Result<(), FruitspinError> {
    let window = web_sys::window().expect("no global window");
    let document = window.document().expect("no document");

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| FruitspinError::CanvasNotFound(CANVAS_ID.into()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| FruitspinError::CanvasNotFound(CANVAS_ID.into()))?;

    let machine = build_machine()?;

    let dpi_scale = window.device_pixel_ratio() as f32;
    let css_width = canvas.client_width() as f32;
    let css_height = canvas.client_height() as f32;
    let (physical_width, physical_height) = gpu::surface_size(
        (css_width * dpi_scale) as u32,
        (css_height * dpi_scale) as u32,
    );

    canvas.set_width(physical_width);
    canvas.set_height(physical_height);

    log::info!(
        "Canvas: {}x{} CSS, {}x{} physical (DPI: {:.2})",
        css_width,
        css_height,
        physical_width,
        physical_height,
        dpi_scale
    );

    // Listeners are registered once and live for the page lifetime
    let input_state = Rc::new(RefCell::new(input::InputState::new()));
    input::register_input_listeners(&canvas, &document, input_state.clone());

    let gpu_ctx = gpu::init_gpu(canvas, physical_width, physical_height).await?;
    let application = app::Application::new(gpu_ctx, dpi_scale, input_state, machine);
    let app_rc = Rc::new(RefCell::new(application));

    app::Application::start_loop(app_rc);

    Ok(())
}

/// Parse and validate the embedded data, seeding the machine from the clock.
fn build_machine() -> Result<RoundCoordinator, FruitspinError> {
    let catalog = fruitspin_rules::defaults::default_catalog()
        .map_err(|e| FruitspinError::DataLoadFailed(e.to_string()))?;
    let config = fruitspin_rules::defaults::default_config()
        .map_err(|e| FruitspinError::DataLoadFailed(e.to_string()))?;

    let jitter = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let seed = (js_sys::Date::now() as u64) ^ (jitter << 20);

    RoundCoordinator::new(catalog, config, seed).map_err(|errors| {
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        FruitspinError::ConfigRejected(joined.join("; "))
    })
}

/// Surface a fatal error in the page, not only the console.
fn show_error_to_user(msg: &str) {
    log::error!("{msg}");
    let window = web_sys::window().expect("no global window");
    let _ = window.alert_with_message(&format!("Fruitspin Error: {msg}"));
}
