//! Rendererモジュール
//!
//! WebGPUでカルーセルの平面を描画する

mod depth;
mod gpu_context;
mod plane_pipeline;
mod texture;

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, ImageData};

use carousel_interaction::Carousel;
use carousel_renderer::{PlaneUniform, TextureId};

use gpu_context::GpuContext;
use plane_pipeline::PlanePipeline;
use texture::PlaneTexture;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Renderer構造体
pub struct Renderer {
    ctx: GpuContext,
    planes: PlanePipeline,
    textures: Vec<PlaneTexture>,

    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    destroyed: bool,
}

impl Renderer {
    /// 新しいRendererを作成（非同期）
    pub async fn create(canvas: HtmlCanvasElement, plane_size: [f32; 2]) -> Result<Renderer, JsValue> {
        let ctx = GpuContext::new(canvas).await?;
        let planes = PlanePipeline::new(&ctx, plane_size);
        let (depth_texture, depth_view) =
            depth::create_texture(&ctx.device, ctx.size.0, ctx.size.1);

        log::info!("renderer initialized");

        Ok(Self {
            ctx,
            planes,
            textures: Vec::new(),
            depth_texture,
            depth_view,
            destroyed: false,
        })
    }

    /// 画像を読み込み、各画像のテクスチャIDを返す
    pub fn upload_images(&mut self, images: &[ImageData]) -> Result<Vec<TextureId>, JsValue> {
        let mut ids = Vec::with_capacity(images.len());
        for image in images {
            let index = self.textures.len();
            let texture = PlaneTexture::from_image_data(
                &self.ctx,
                &self.planes.texture_layout,
                &self.planes.sampler,
                image,
                &format!("Plane Texture {index}"),
            )?;
            log::debug!("uploaded texture {index} ({}x{})", texture.size.0, texture.size.1);
            self.textures.push(texture);
            ids.push(TextureId(index as u32));
        }
        Ok(ids)
    }

    /// 平面の枚数に合わせてUniformバッファを用意
    pub fn prepare(&mut self, plane_count: usize) {
        self.planes.ensure_slots(&self.ctx.device, plane_count);
    }

    /// 1フレーム描画
    pub fn render(&self, carousel: &Carousel) -> Result<(), JsValue> {
        if self.destroyed {
            return Ok(());
        }

        let output = self
            .ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("Failed to get surface texture: {e:?}")))?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ctx.queue.write_buffer(
            &self.planes.camera_buffer,
            0,
            bytemuck::bytes_of(&carousel.camera().uniform()),
        );

        // 平面ごとのUniformを書き込み、描画対象を集める
        let rig = carousel.rig();
        let draws: Vec<(&wgpu::BindGroup, &wgpu::BindGroup)> = carousel
            .planes()
            .iter()
            .filter_map(|plane| {
                let world = rig.plane_world(plane.index)?;
                let slot = self.planes.slots.get(plane.index)?;
                let texture = self.textures.get(plane.uniforms.texture.0 as usize)?;
                self.ctx.queue.write_buffer(
                    &slot.buffer,
                    0,
                    bytemuck::bytes_of(&PlaneUniform::new(world, &plane.uniforms)),
                );
                Some((&slot.bind_group, &texture.bind_group))
            })
            .collect();

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Carousel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.planes.pipeline);
            render_pass.set_bind_group(0, &self.planes.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.planes.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.planes.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            for (plane, texture) in draws {
                render_pass.set_bind_group(1, plane, &[]);
                render_pass.set_bind_group(2, texture, &[]);
                render_pass.draw_indexed(0..self.planes.num_indices, 0, 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Canvas サイズ変更
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.destroyed || !self.ctx.resize(width, height) {
            return false;
        }
        let (depth_texture, depth_view) = depth::create_texture(&self.ctx.device, width, height);
        self.depth_texture.destroy();
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
        log::debug!("resized to {width}x{height}");
        true
    }

    pub fn aspect(&self) -> f32 {
        self.ctx.aspect()
    }

    pub fn size(&self) -> (u32, u32) {
        self.ctx.size
    }

    /// テクスチャ・バッファを解放（以降の描画は何もしない）
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for texture in self.textures.drain(..) {
            texture.texture.destroy();
        }
        self.planes.destroy();
        self.depth_texture.destroy();
        self.destroyed = true;
        log::info!("renderer resources released");
    }
}
