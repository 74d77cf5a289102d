use bytemuck::*;
use glam::*;
use glyphon::{
    Attrs, Buffer as TextBuffer, Color as TextColor, Family, FontSystem, Metrics, Resolution,
    Shaping, SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer,
};
use image::{imageops::FilterType, Rgba, RgbaImage};
use log::*;
use std::{borrow::Cow, collections::HashMap, mem::size_of};
use wgpu::{util::*, *};
use winit::{dpi::PhysicalSize, window::Window};

use crate::error::{GameError, Result};
use crate::resources::FontChoice;
use crate::surface::{Font, PictureId, PixelRect, Rgb, TextAnchor};

const LINE_HEIGHT: f32 = 1.2;

#[repr(C)]
#[derive(Copy, Clone, Zeroable, Pod)]
struct Uniform {
    transform: Mat4,
    tex_transform: Mat4,
    color: Vec4,
    textured: f32,

    // manual paddings
    p0: f32,
    p1: f32,
    p2: f32,
}

struct Picture {
    bind_group: BindGroup,
    size: UVec2,
}

struct QueuedText {
    buffer: TextBuffer,
    left: f32,
    top: f32,
    color: TextColor,
}

struct FrameTarget {
    frame: SurfaceTexture,
    view: TextureView,
}

fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// Largest size with the same aspect ratio that fits a `limit` square texture
fn fit_within(size: UVec2, limit: u32) -> UVec2 {
    let longest = size.max_element();
    if longest <= limit {
        return size;
    }
    let scale = limit as f64 / longest as f64;
    let fitted = (size.as_dvec2() * scale).floor().as_uvec2();
    fitted.max(UVec2::ONE).min(UVec2::splat(limit))
}

/// wgpu render target for the game window. Pictures are textured quads,
/// text goes through glyphon and is drawn on top at `present`.
pub struct GpuSurface<'window> {
    device: Device,
    surface: Surface<'window>,
    queue: Queue,
    config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    sampler: Sampler,
    white: BindGroup,

    pictures: HashMap<PictureId, Picture>,
    next_picture: u32,
    canvas: UVec2,
    target: Option<FrameTarget>,

    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    text_renderer: TextRenderer,
    font_family: Option<String>,
    title_px: f32,
    body_px: f32,
    texts: Vec<QueuedText>,
}

impl<'window> GpuSurface<'window> {
    pub async fn new(
        window: &'window Window,
        canvas: UVec2,
        title_px: f32,
        body_px: f32,
    ) -> Result<GpuSurface<'window>> {
        let mut size = window.inner_size();
        size.width = size.width.max(1);
        size.height = size.height.max(1);

        let instance = Instance::default();

        let surface = instance
            .create_surface(window)
            .map_err(|e| GameError::Gpu(e.to_string()))?;
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or_else(|| GameError::Gpu("no suitable adapter".to_owned()))?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: None,
                    required_features: Features::empty(),
                    required_limits: Limits::default().using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| GameError::Gpu(e.to_string()))?;

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: None,
            source: ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let swapchain_capabilities = surface.get_capabilities(&adapter);
        let swapchain_format = swapchain_capabilities
            .formats
            .first()
            .copied()
            .ok_or_else(|| GameError::Gpu("surface has no formats".to_owned()))?;
        let render_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[VertexBufferLayout {
                    array_stride: 8,
                    step_mode: VertexStepMode::Vertex,
                    attributes: &[VertexAttribute {
                        format: VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format: swapchain_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
        });

        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: None,
            size: size_of::<Uniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });

        // Enable VSync
        let mut config = surface
            .get_default_config(&adapter, size.width, size.height)
            .ok_or_else(|| GameError::Gpu("surface is not supported".to_owned()))?;
        config.present_mode = PresentMode::Fifo;
        surface.configure(&device, &config);

        let vertex_buffer_content: &[f32] = &[-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: None,
            contents: cast_slice(vertex_buffer_content),
            usage: BufferUsages::VERTEX,
        });

        let white_image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let white = create_picture(
            &device,
            &queue,
            &bind_group_layout,
            &uniform_buffer,
            &sampler,
            &white_image,
        )
        .bind_group;

        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let mut atlas = TextAtlas::new(&device, &queue, swapchain_format);
        let text_renderer =
            TextRenderer::new(&mut atlas, &device, MultisampleState::default(), None);

        Ok(GpuSurface {
            device,
            surface,
            queue,
            config,
            render_pipeline,
            bind_group_layout,
            uniform_buffer,
            vertex_buffer,
            sampler,
            white,

            pictures: HashMap::new(),
            next_picture: 0,
            canvas,
            target: None,

            font_system,
            swash_cache,
            atlas,
            text_renderer,
            font_family: None,
            title_px,
            body_px,
            texts: vec![],
        })
    }

    /// Register the typeface for all text. A font file the shaper cannot
    /// parse is an error; the caller decides on the fallback.
    pub fn use_font(&mut self, choice: FontChoice) -> Result<()> {
        match choice {
            FontChoice::Custom { path, family, data } => {
                let before = self.font_system.db().len();
                self.font_system.db_mut().load_font_data(data);
                if self.font_system.db().len() == before {
                    return Err(GameError::Font {
                        path,
                        reason: "no usable font face".to_owned(),
                    });
                }
                info!("Using font {family:?} from {}", path.display());
                self.font_family = Some(family);
            }
            FontChoice::System => self.font_family = None,
        }
        Ok(())
    }

    // Handle window resize event
    pub fn resized(&mut self, new_size: PhysicalSize<u32>) {
        self.config.width = new_size.width.max(1);
        self.config.height = new_size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn font_px(&self, font: Font) -> f32 {
        match font {
            Font::Title => self.title_px,
            Font::Body => self.body_px,
        }
    }

    // Swap chain colors are linear when the format is sRGB
    fn color(&self, Rgb(r, g, b): Rgb) -> Color {
        if self.config.format.is_srgb() {
            Color {
                r: srgb_to_linear(r),
                g: srgb_to_linear(g),
                b: srgb_to_linear(b),
                a: 1.0,
            }
        } else {
            Color {
                r: r as f64 / 255.0,
                g: g as f64 / 255.0,
                b: b as f64 / 255.0,
                a: 1.0,
            }
        }
    }

    // Lay out a single line of text. Returns the buffer and its width.
    fn shape(&mut self, text: &str, font: Font) -> (TextBuffer, f32) {
        let px = self.font_px(font);
        let mut buffer = TextBuffer::new(&mut self.font_system, Metrics::new(px, px * LINE_HEIGHT));
        buffer.set_size(
            &mut self.font_system,
            self.canvas.x as f32,
            px * LINE_HEIGHT * 2.0,
        );
        let family = match &self.font_family {
            Some(name) => Family::Name(name.as_str()),
            None => Family::SansSerif,
        };
        buffer.set_text(
            &mut self.font_system,
            text,
            Attrs::new().family(family),
            Shaping::Advanced,
        );
        let width = buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max);
        (buffer, width)
    }

    // Canvas pixels to normalized device coordinates
    fn quad_transform(&self, dst: PixelRect) -> Mat4 {
        let canvas = self.canvas.as_vec2();
        let center = (dst.pos.as_vec2() + dst.size.as_vec2() * 0.5) / canvas * 2.0 - 1.0;
        Mat4::from_translation(vec3(center.x, -center.y, 0.0))
            * Mat4::from_scale((dst.size.as_vec2() / canvas).extend(1.0))
    }

    // Acquire the swap chain texture for this frame if we don't hold one yet
    fn ensure_target(&mut self) -> bool {
        if self.target.is_some() {
            return true;
        }
        match self.surface.get_current_texture() {
            Ok(frame) => {
                let view = frame.texture.create_view(&TextureViewDescriptor::default());
                self.target = Some(FrameTarget { frame, view });
                true
            }
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                false
            }
            Err(e) => {
                warn!("Dropping frame: {e}");
                false
            }
        }
    }

    fn draw_quad(&mut self, picture: Option<PictureId>, uniform: Uniform) {
        if !self.ensure_target() {
            return;
        }
        let Some(target) = &self.target else {
            return;
        };
        let bind_group = match picture {
            Some(id) => match self.pictures.get(&id) {
                Some(picture) => &picture.bind_group,
                None => {
                    warn!("Drawing unknown picture {id:?}");
                    return;
                }
            },
            None => &self.white,
        };

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytes_of(&uniform));
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.render_pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.draw(0..4, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn fill(&mut self, color: Rgb, rect: PixelRect) {
        let Color { r, g, b, a } = self.color(color);
        let uniform = Uniform {
            transform: self.quad_transform(rect),
            tex_transform: Mat4::IDENTITY,
            color: dvec4(r, g, b, a).as_vec4(),
            textured: 0.0,
            p0: 0.0,
            p1: 0.0,
            p2: 0.0,
        };
        self.draw_quad(None, uniform);
    }
}

fn create_picture(
    device: &Device,
    queue: &Queue,
    bind_group_layout: &BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    sampler: &Sampler,
    img: &RgbaImage,
) -> Picture {
    let texture_size = Extent3d {
        width: img.width(),
        height: img.height(),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&TextureDescriptor {
        label: None,
        size: texture_size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::Rgba8UnormSrgb,
        usage: TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    queue.write_texture(
        texture.as_image_copy(),
        img.as_raw(),
        ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(texture_size.width * 4),
            rows_per_image: None,
        },
        texture_size,
    );
    let texture_view = texture.create_view(&TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: None,
        layout: bind_group_layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(&texture_view),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    });
    Picture {
        bind_group,
        size: uvec2(img.width(), img.height()),
    }
}

impl crate::surface::Surface for GpuSurface<'_> {
    fn size(&self) -> UVec2 {
        self.canvas
    }

    fn load_picture(&mut self, image: &RgbaImage) -> Result<PictureId> {
        let limit = self.device.limits().max_texture_dimension_2d;
        let size = uvec2(image.width(), image.height());
        let fitted = fit_within(size, limit);
        let mut picture = if fitted == size {
            create_picture(
                &self.device,
                &self.queue,
                &self.bind_group_layout,
                &self.uniform_buffer,
                &self.sampler,
                image,
            )
        } else {
            debug!("Scaling picture {size} down to {fitted} to fit the texture limit");
            let scaled = image::imageops::resize(image, fitted.x, fitted.y, FilterType::Triangle);
            create_picture(
                &self.device,
                &self.queue,
                &self.bind_group_layout,
                &self.uniform_buffer,
                &self.sampler,
                &scaled,
            )
        };
        // Blit sources stay in the picture's own pixels
        picture.size = size;
        let id = PictureId(self.next_picture);
        self.next_picture += 1;
        self.pictures.insert(id, picture);
        Ok(id)
    }

    fn release_picture(&mut self, picture: PictureId) {
        if self.pictures.remove(&picture).is_none() {
            warn!("Releasing unknown picture {picture:?}");
        }
    }

    fn clear(&mut self, color: Rgb) {
        if !self.ensure_target() {
            return;
        }
        let clear_color = self.color(color);
        let Some(target) = &self.target else {
            return;
        };
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        {
            let _ = encoder.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn blit(&mut self, picture: PictureId, src: PixelRect, dst: PixelRect) {
        let Some(texture_size) = self.pictures.get(&picture).map(|p| p.size.as_vec2()) else {
            warn!("Drawing unknown picture {picture:?}");
            return;
        };
        let uv_size = src.size.as_vec2() / texture_size;
        let uv_center = src.pos.as_vec2() / texture_size + uv_size * 0.5;
        let tex_transform = Mat4::from_translation(uv_center.extend(0.0))
            * Mat4::from_scale(vec3(uv_size.x * 0.5, -uv_size.y * 0.5, 1.0));
        let uniform = Uniform {
            transform: self.quad_transform(dst),
            tex_transform,
            color: Vec4::ONE,
            textured: 1.0,
            p0: 0.0,
            p1: 0.0,
            p2: 0.0,
        };
        self.draw_quad(Some(picture), uniform);
    }

    fn outline(&mut self, color: Rgb, rect: PixelRect, thickness: u32) {
        let t = thickness.min(rect.size.x).min(rect.size.y);
        let PixelRect { pos, size } = rect;
        let inner = size.y.saturating_sub(2 * t);
        self.fill(color, PixelRect::new(pos.x, pos.y, size.x, t));
        self.fill(
            color,
            PixelRect::new(pos.x, pos.y + (size.y - t) as i32, size.x, t),
        );
        self.fill(color, PixelRect::new(pos.x, pos.y + t as i32, t, inner));
        self.fill(
            color,
            PixelRect::new(pos.x + (size.x - t) as i32, pos.y + t as i32, t, inner),
        );
    }

    fn text(&mut self, text: &str, font: Font, color: Rgb, anchor: TextAnchor) {
        if text.is_empty() {
            return;
        }
        let (buffer, width) = self.shape(text, font);
        let line_height = self.font_px(font) * LINE_HEIGHT;
        let (left, top) = match anchor {
            TextAnchor::TopLeft(pos) => (pos.x as f32, pos.y as f32),
            TextAnchor::Center(pos) => (
                pos.x as f32 - width / 2.0,
                pos.y as f32 - line_height / 2.0,
            ),
        };
        let Rgb(r, g, b) = color;
        self.texts.push(QueuedText {
            buffer,
            left,
            top,
            color: TextColor::rgb(r, g, b),
        });
    }

    fn measure_text(&mut self, text: &str, font: Font) -> f32 {
        self.shape(text, font).1
    }

    fn present(&mut self) -> Result<()> {
        let texts = std::mem::take(&mut self.texts);
        let Some(target) = self.target.take() else {
            return Ok(());
        };

        if !texts.is_empty() {
            let canvas = self.canvas.as_ivec2();
            let areas = texts.iter().map(|text| TextArea {
                buffer: &text.buffer,
                left: text.left,
                top: text.top,
                scale: 1.0,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: canvas.x,
                    bottom: canvas.y,
                },
                default_color: text.color,
            });
            self.text_renderer
                .prepare(
                    &self.device,
                    &self.queue,
                    &mut self.font_system,
                    &mut self.atlas,
                    Resolution {
                        width: self.canvas.x,
                        height: self.canvas.y,
                    },
                    areas,
                    &mut self.swash_cache,
                )
                .map_err(|e| GameError::Gpu(format!("text prepare: {e:?}")))?;

            let mut encoder = self
                .device
                .create_command_encoder(&CommandEncoderDescriptor { label: None });
            {
                let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: None,
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &target.view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                self.text_renderer
                    .render(&self.atlas, &mut rpass)
                    .map_err(|e| GameError::Gpu(format!("text render: {e:?}")))?;
            }
            self.queue.submit(Some(encoder.finish()));
        }

        target.frame.present();
        self.atlas.trim();
        Ok(())
    }
}
