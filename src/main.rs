use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    event::*,
    event_loop::EventLoop,
    window::Window,
};

// Import from the library crate
use runner::{config, controller, logging, model, view};

use config::GameConfig;
use controller::input::native;
use controller::{FrameClock, InputEvent, Simulation};
use model::{build_plane, build_sphere};
use view::{build_draw_list, load_gltf_mesh, FrameRenderer, FrameUniform, GpuContext, ResourceCache, SceneTextures};

struct App {
    window: Arc<Window>,
    gpu: GpuContext,

    // Rendering state
    renderer: FrameRenderer,
    resources: ResourceCache,
    textures: SceneTextures,

    // Game state
    simulation: Simulation,
    clock: FrameClock,
    config: GameConfig,
}

impl App {
    async fn new(window: Arc<Window>, config: GameConfig) -> anyhow::Result<Self> {
        let gpu = GpuContext::new_native(window.clone()).await?;
        let device = gpu.device.clone();
        let queue = gpu.queue.clone();

        // Procedural meshes
        let ground = build_plane(config.world.plane_half_extent);
        let sphere = build_sphere(config.pickups.sphere_stacks, config.pickups.sphere_slices)?;

        let player_mesh = match load_gltf_mesh(Path::new(&config.assets.player_model)) {
            Ok(mesh) => mesh,
            Err(e) => {
                tracing::warn!("{e}; drawing the player as a sphere");
                sphere.clone()
            }
        };

        let mut resources = ResourceCache::new(&device, &queue, &ground, &player_mesh, &sphere);
        let textures = SceneTextures {
            ground: resources.load_texture(&device, &queue, &config.assets.ground_texture),
            player: resources.load_texture(&device, &queue, &config.assets.player_texture),
            white: resources.create_white_texture(&device, &queue),
        };

        let simulation = Simulation::new(&config);
        let renderer = FrameRenderer::new(
            &device,
            gpu.format,
            gpu.config.width,
            gpu.config.height,
            &resources.texture_layout,
            2 + simulation.pickups.len(),
            config.world.clear_color,
        );

        Ok(Self {
            window,
            gpu,
            renderer,
            resources,
            textures,
            simulation,
            clock: FrameClock::new(Instant::now()),
            config,
        })
    }

    fn input(&mut self, event: &WindowEvent) {
        let input = match event {
            WindowEvent::KeyboardInput { event, .. } => native::keyboard_event_to_input(event),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            WindowEvent::CloseRequested => Some(InputEvent::CloseRequested),
            _ => None,
        };
        if let Some(input) = input {
            self.simulation.handle_event(&input);
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if self.gpu.resize(new_size.width, new_size.height) {
            self.renderer.resize(&self.gpu.device, new_size.width, new_size.height);
        }
    }

    /// One main-loop iteration: step, draw, collect, present.
    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let dt = self.clock.tick(Instant::now());
        let camera = self.simulation.advance(dt, self.gpu.config.width, self.gpu.config.height);

        let commands = build_draw_list(
            self.simulation.player(),
            &self.simulation.pickups,
            &self.textures,
            self.config.world.ground_tiling,
        );
        let frame = FrameUniform::new(&camera, &self.config.lighting);
        self.renderer.draw(&self.gpu.device, &self.gpu.queue, &view, &frame, &commands, &self.resources);

        self.simulation.collect_pickups();
        output.present();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = GameConfig::default();
    let event_loop = EventLoop::new()?;
    let window_attributes = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height));
    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut app = match pollster::block_on(App::new(window, config)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("initialization failed: {e:#}");
            return Err(e);
        }
    };
    tracing::info!("entering main loop");

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                app.input(event);
                if app.simulation.exit_requested() {
                    elwt.exit();
                    return;
                }
                match event {
                    WindowEvent::Resized(physical_size) => {
                        app.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => match app.frame() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.gpu.reconfigure(),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("surface out of memory");
                            elwt.exit();
                        }
                        Err(e) => tracing::warn!("skipping frame: {e:?}"),
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            Event::LoopExiting => {
                tracing::info!(
                    collected = app.simulation.pickups.collected_count(),
                    total = app.simulation.pickups.len(),
                    "shutting down"
                );
            }
            _ => {}
        }
    })?;

    Ok(())
}
