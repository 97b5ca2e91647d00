use scene_selection_engine::engine::core::app_setup::create_app;
use scene_selection_engine::tools::selection::settings::SelectionSettings;

fn main() {
    let mut app = create_app(load_settings());

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> SelectionSettings {
    use constants::selection::SELECTION_SETTINGS_PATH;

    match SelectionSettings::load(SELECTION_SETTINGS_PATH) {
        Ok(settings) => {
            println!("Loaded selection settings from {SELECTION_SETTINGS_PATH}");
            settings
        }
        Err(err) => {
            println!("Using default selection settings ({err})");
            SelectionSettings::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_settings() -> SelectionSettings {
    SelectionSettings::default()
}
