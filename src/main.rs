#![cfg_attr(target_family = "wasm", no_main)]
#![allow(dead_code)]
use nannou::prelude::*;
#[cfg(target_family = "wasm")]
use nannou::{
    app,
    wgpu::{Backends, DeviceDescriptor, Limits},
};
use std::sync::OnceLock;

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::*;

pub mod audio;
pub mod ball;
pub mod bounds;
pub mod config;
pub mod console;
pub mod input;
pub mod linear_area;
pub mod model;
pub mod note_line;
pub mod piano_roll;
pub mod pos;
pub mod render;
pub mod scale;
pub mod session;

use config::Settings;
use console::console_log;
use model::Model;

/// Settings are resolved before nannou starts and read back by the model
/// function, which cannot take arguments.
static SETTINGS: OnceLock<Settings> = OnceLock::new();

fn settings() -> Settings {
    SETTINGS.get().cloned().unwrap_or_default()
}

#[cfg(target_family = "wasm")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console::init();
    let _ = SETTINGS.set(config::from_url(Settings::default()));

    app::Builder::new_async(|app| {
        Box::new(async move {
            create_window(app).await;
            Model::new(settings())
        })
    })
    .backends(Backends::PRIMARY | Backends::GL)
    .update(update)
    .run_async()
    .await;

    Ok(())
}

#[cfg(target_family = "wasm")]
async fn create_window(app: &App) {
    let settings = settings();
    let device_desc = DeviceDescriptor {
        limits: Limits {
            max_texture_dimension_2d: 8192,
            ..Limits::downlevel_webgl2_defaults()
        },
        ..Default::default()
    };

    app.new_window()
        .size(settings.canvas_width as u32, settings.canvas_height as u32)
        .device_descriptor(device_desc)
        .title("Soundball")
        .view(render::view)
        .event(input::event)
        .build_async()
        .await
        .unwrap();
}

#[cfg(not(target_family = "wasm"))]
fn model(app: &App) -> Model {
    let settings = settings();
    app.new_window()
        .size(settings.canvas_width as u32, settings.canvas_height as u32)
        .title("Soundball")
        .view(render::view)
        .event(input::event)
        .build()
        .unwrap();

    Model::new(settings)
}

fn update(_app: &App, m: &mut Model, update: Update) {
    let worth_updating = m.with_audio(|session, audio| session.advance(update.since_last, audio));
    m.finish_update(worth_updating);
}

#[cfg(not(target_family = "wasm"))]
fn main() {
    use clap::Parser;

    console::init();
    let cli = config::Cli::parse();
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    console_log!("starting with {:?}", settings);
    let _ = SETTINGS.set(settings);

    nannou::app(model).update(update).run();
}
