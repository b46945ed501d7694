use anyhow::{Context, Result};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use lattice_engine::core::{App, AppControl, FrameCtx};
use lattice_engine::device::GpuInit;
use lattice_engine::geometry::primitives;
use lattice_engine::logging::{init_logging, LoggingConfig};
use lattice_engine::render::{Mode, Renderer, RendererConfig};
use lattice_engine::resources::{Material, Model};
use lattice_engine::window::{Runtime, RuntimeConfig};

const TILE_COLS: u32 = 4;
const TILE_ROWS: u32 = 3;

/// Toggles between the textured quad and the tiled mesh.
///
/// `Tab` or `M` switches mode, `Escape` quits.
struct Viewer {
    config: RendererConfig,
    renderer: Option<Renderer>,
    /// Adapter name shown in the title.
    adapter: String,
    pending_mode: Option<Mode>,
    exit: bool,
}

impl Viewer {
    fn new(config: RendererConfig) -> Self {
        Self {
            config,
            renderer: None,
            adapter: String::new(),
            pending_mode: None,
            exit: false,
        }
    }

    fn mode(&self) -> Mode {
        self.renderer
            .as_ref()
            .map_or(self.config.mode, Renderer::mode)
    }

    fn title(&self, mode: Mode) -> String {
        title(mode, &self.adapter)
    }

    fn build_renderer(&self, ctx: &FrameCtx<'_, '_>) -> Result<Renderer> {
        let mut renderer = Renderer::new(
            ctx.gpu.device().clone(),
            ctx.gpu.queue().clone(),
            ctx.gpu.surface_format(),
            self.config,
        )?;

        let tiles = renderer.add_mesh(&primitives::tiles(TILE_COLS, TILE_ROWS, 0.9, 0.04)?)?;

        let builtins = renderer.builtin_textures();
        let palette = [
            ("checker", builtins.checker),
            ("white", builtins.white),
            ("magenta", builtins.magenta),
            ("normal", builtins.normal),
        ];
        let materials = palette
            .iter()
            .map(|(name, texture)| renderer.add_material(Material::new(*name, *texture)))
            .collect::<Vec<_>>();

        // One material per tile, cycling through the palette.
        let per_submesh = (0..(TILE_COLS * TILE_ROWS) as usize)
            .map(|i| materials[i % materials.len()])
            .collect();
        renderer.add_model(Model::new(tiles, per_submesh))?;

        Ok(renderer)
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        else {
            return AppControl::Continue;
        };

        match code {
            KeyCode::Escape => self.exit = true,
            KeyCode::Tab | KeyCode::KeyM => self.pending_mode = Some(self.mode().next()),
            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.exit {
            return AppControl::Exit;
        }

        if self.renderer.is_none() {
            match self.build_renderer(ctx) {
                Ok(renderer) => {
                    self.adapter = ctx.gpu.info().name.clone();
                    ctx.window.set_title(&self.title(renderer.mode()));
                    self.renderer = Some(renderer);
                }
                Err(err) => {
                    log::error!("failed to set up renderer: {err:#}");
                    return AppControl::Exit;
                }
            }
        }

        if let Some(mode) = self.pending_mode.take() {
            let title = self.title(mode);
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.set_mode(mode);
                ctx.window.set_title(&title);
            }
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Exit;
        };

        ctx.render(|target| {
            renderer.render(target);
        })
    }
}

fn title(mode: Mode, adapter: &str) -> String {
    if adapter.is_empty() {
        format!("lattice viewer: {mode}")
    } else {
        format!("lattice viewer: {mode} on {adapter}")
    }
}

/// First argument selects the starting mode; anything else is rejected.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<RendererConfig> {
    let mut config = RendererConfig::default();
    if let Some(arg) = args.next() {
        config.mode = arg
            .parse::<Mode>()
            .context("usage: lattice-viewer [quad|mesh]")?;
    }
    anyhow::ensure!(args.next().is_none(), "usage: lattice-viewer [quad|mesh]");
    Ok(config)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = parse_args(std::env::args().skip(1))?;
    log::info!("starting in {} mode (Tab/M to switch, Esc to quit)", config.mode);

    Runtime::run(
        RuntimeConfig {
            title: "lattice viewer".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        Viewer::new(config),
    )
}
