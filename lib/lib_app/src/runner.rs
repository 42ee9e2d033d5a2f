use std::{sync::Arc, time::Instant};

use wgpu::{
    Device, DeviceDescriptor, Instance, PollType, Queue, RequestAdapterOptions, Surface,
    SurfaceConfiguration, TextureViewDescriptor,
};
use winit::{
    application::ApplicationHandler,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{AppContext, AppEvent, AppFlow, AppHandler};

/// Runs the handler until it returns [`AppFlow::Exit`] or the window closes.
pub fn run_app<T: AppHandler>(init: T::Init) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;

    let mut application = AppRunner::<T>::Uninitialized(Some(init));

    event_loop.run_app(&mut application)
}

enum AppRunner<T: AppHandler> {
    Uninitialized(Option<T::Init>),
    Initialized(InitializedAppRunner<T>),
}

struct InitializedAppRunner<T: AppHandler> {
    window: Arc<Window>,
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    app: T,
    last_instant: Instant,
}

impl<T: AppHandler> ApplicationHandler for AppRunner<T> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppRunner::Uninitialized(init) = self else {
            return;
        };

        let init = init.take().expect("App resumed twice without suspension");

        *self = AppRunner::Initialized(InitializedAppRunner::new(init, event_loop));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let AppRunner::Initialized(init_self) = self else {
            return;
        };

        let now = Instant::now();

        // Fixed-interval pacing: sleep out the remainder of the frame instead
        // of updating again. No compensation for time already spent drawing.
        if let Some(interval) = T::FRAME_INTERVAL {
            let due = init_self.last_instant + interval;
            if now < due {
                event_loop.set_control_flow(ControlFlow::WaitUntil(due));
                return;
            }
        }

        let delta_time = now.duration_since(init_self.last_instant);
        init_self.last_instant = now;

        handle_appflow!(
            event_loop,
            init_self.app.update(
                delta_time,
                AppContext {
                    window: &init_self.window,
                    device: &init_self.device,
                    queue: &init_self.queue,
                    surface_format: init_self.surface_config.format,
                },
            )
        );

        init_self.window.request_redraw();

        if let Some(interval) = T::FRAME_INTERVAL {
            event_loop.set_control_flow(ControlFlow::WaitUntil(now + interval));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Self::Initialized(init_self) = self else {
            return;
        };

        let app_event = match &event {
            WindowEvent::CloseRequested => AppEvent::CloseRequested,
            _ => AppEvent::UnhandledWindowEvent(&event),
        };

        handle_appflow!(
            event_loop,
            init_self.app.event(
                app_event,
                AppContext {
                    window: &init_self.window,
                    device: &init_self.device,
                    queue: &init_self.queue,
                    surface_format: init_self.surface_config.format,
                },
            )
        );

        match &event {
            WindowEvent::RedrawRequested => 'redraw: {
                let Ok(texture) = init_self.surface.get_current_texture() else {
                    break 'redraw;
                };

                init_self.app.draw(
                    &texture
                        .texture
                        .create_view(&TextureViewDescriptor::default()),
                    AppContext {
                        window: &init_self.window,
                        device: &init_self.device,
                        queue: &init_self.queue,
                        surface_format: init_self.surface_config.format,
                    },
                );

                init_self.window.pre_present_notify();
                texture.present();

                init_self
                    .device
                    .poll(PollType::Poll)
                    .expect("Failed to poll");
            }
            WindowEvent::Resized(size) => {
                init_self.surface_config.width = size.width;
                init_self.surface_config.height = size.height;

                init_self
                    .surface
                    .configure(&init_self.device, &init_self.surface_config);
            }
            _ => {}
        }
    }
}

impl<T: AppHandler> InitializedAppRunner<T> {
    fn new(init: T::Init, event_loop: &ActiveEventLoop) -> Self {
        let window = Arc::new(
            event_loop
                .create_window(T::window_attributes(&init))
                .expect("Failed to create main window"),
        );

        let instance = Instance::default();

        let adapter =
            pollster::block_on(instance.request_adapter(&RequestAdapterOptions::default()))
                .expect("Failed to get adapter");

        let (device, queue) =
            pollster::block_on(adapter.request_device(&DeviceDescriptor::default()))
                .expect("Failed to get device");

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let surface_config = surface
            .get_default_config(
                &adapter,
                window.inner_size().width,
                window.inner_size().height,
            )
            .expect("Failed to get default surface configuration");

        surface.configure(&device, &surface_config);

        let app = T::new(
            init,
            AppContext {
                window: &window,
                device: &device,
                queue: &queue,
                surface_format: surface_config.format,
            },
        );

        let last_instant = Instant::now();

        Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            app,
            last_instant,
        }
    }
}

macro_rules! handle_appflow {
    ($event_loop:expr, $flow:expr) => {
        match $flow {
            AppFlow::Continue => {}
            AppFlow::Exit => {
                $event_loop.exit();
                return;
            }
        }
    };
}

use handle_appflow;
