//! Render one of the built-in scenes to a PNG.
//!
//! Usage: `render_scene [scene] [output.png] [config.json] [texture.png]`
//!
//! Scenes: `perlin-spheres` (default), `random-spheres`, `simple-light`,
//! `cornell-box`, `cornell-smoke`, `earth`, `final-scene`.
//! The optional JSON file holds a `RenderConfig`; without one each scene
//! picks its own background and a moderate sample count.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use lumen_renderer::sampling::{gen_f32, gen_range, random_vec3};
use lumen_renderer::{
    render_parallel, AxisAlignedRect, Background, BvhNode, CheckerTexture, Camera, Color,
    ConstantMedium, Cuboid, Dielectric, DiffuseLight, FlipFace, Hittable, HittableList,
    ImageTexture, Lambertian, Material, Metal, MovingSphere, NoiseTexture, RenderConfig, RotateY,
    Sphere, Texture, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SKY: Color = Color::new(0.7, 0.8, 1.0);

struct Scene {
    world: BvhNode,
    camera: Camera,
    background: Background,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scene_name = args.first().map(String::as_str).unwrap_or("perlin-spheres");
    let output = args.get(1).map(String::as_str).unwrap_or("output.png");
    let texture_path = args.get(3).map(String::as_str).unwrap_or("earthmap.jpg");

    // Scene construction is seeded separately from rendering
    let mut rng = StdRng::seed_from_u64(0);
    let scene = match scene_name {
        "perlin-spheres" => perlin_spheres(&mut rng)?,
        "random-spheres" => random_spheres(&mut rng)?,
        "simple-light" => simple_light(&mut rng)?,
        "cornell-box" => cornell_box(&mut rng)?,
        "cornell-smoke" => cornell_smoke(&mut rng)?,
        "earth" => earth(texture_path, &mut rng)?,
        "final-scene" => final_scene(texture_path, &mut rng)?,
        other => bail!(
            "unknown scene '{other}' (expected perlin-spheres, random-spheres, simple-light, \
             cornell-box, cornell-smoke, earth or final-scene)"
        ),
    };

    let config = match args.get(2) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read render config {path}"))?;
            serde_json::from_str::<RenderConfig>(&text)
                .with_context(|| format!("failed to parse render config {path}"))?
        }
        None => RenderConfig {
            samples_per_pixel: 64,
            background: scene.background,
            ..RenderConfig::default()
        },
    };

    log::info!("Rendering scene '{scene_name}'");
    let image = render_parallel(&scene.camera, &scene.world, &config);
    log::info!("Mean luminance {:.4}", image.mean_luminance());

    image
        .save_png(output)
        .with_context(|| format!("failed to write {output}"))?;

    Ok(())
}

fn camera(width: u32, height: u32, look_from: Vec3, look_at: Vec3, vfov: f32) -> Camera {
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, 0.0, 10.0)
        .with_shutter(0.0, 1.0);
    camera.initialize();
    camera
}

fn image_texture(path: &str) -> Arc<dyn Texture> {
    match ImageTexture::load(path) {
        Ok(texture) => Arc::new(texture),
        Err(e) => {
            log::warn!("Could not load {path} ({e}); rendering the placeholder color");
            Arc::new(ImageTexture::missing())
        }
    }
}

fn noise_spheres(rng: &mut StdRng) -> Vec<Arc<dyn Hittable>> {
    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0, rng));
    let marble: Arc<dyn Material> = Arc::new(Lambertian::with_texture(pertext));

    vec![
        Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())),
        Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)),
    ]
}

fn perlin_spheres(rng: &mut StdRng) -> Result<Scene> {
    let objects = noise_spheres(rng);

    Ok(Scene {
        world: BvhNode::build(objects, 0.0, 1.0, rng)?,
        camera: camera(400, 225, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        background: Background::Solid(SKY),
    })
}

/// Checkered ground under a field of small bouncing, metal and glass spheres.
fn random_spheres(rng: &mut StdRng) -> Result<Scene> {
    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let mut objects: Vec<Arc<dyn Hittable>> = vec![Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(checker)),
    ))];

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(a as f32 + 0.9 * gen_f32(rng), 0.2, b as f32 + 0.9 * gen_f32(rng));
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                objects.push(Arc::new(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                objects.push(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                objects.push(Arc::new(Sphere::new(center, 0.2, glass.clone())));
            }
        }
    }

    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    Ok(Scene {
        world: BvhNode::build(objects, 0.0, 1.0, rng)?,
        camera: camera(400, 225, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        background: Background::Solid(SKY),
    })
}

fn simple_light(rng: &mut StdRng) -> Result<Scene> {
    let mut objects = noise_spheres(rng);

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    objects.push(Arc::new(AxisAlignedRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light.clone())));
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light)));

    Ok(Scene {
        world: BvhNode::build(objects, 0.0, 1.0, rng)?,
        camera: camera(400, 225, Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0),
        background: Background::Solid(Color::ZERO),
    })
}

/// The five walls of the 555-unit Cornell room, with the far-side walls
/// flipped to face the camera.
fn cornell_walls(white: &Arc<dyn Material>) -> Vec<Arc<dyn Hittable>> {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));

    vec![
        Arc::new(FlipFace::new(Arc::new(AxisAlignedRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)))),
        Arc::new(AxisAlignedRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)),
        Arc::new(FlipFace::new(Arc::new(AxisAlignedRect::xz(
            0.0, 555.0, 0.0, 555.0, 555.0, white.clone(),
        )))),
        Arc::new(AxisAlignedRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())),
        Arc::new(FlipFace::new(Arc::new(AxisAlignedRect::xy(
            0.0, 555.0, 0.0, 555.0, 555.0, white.clone(),
        )))),
    ]
}

/// The tall and short boxes, rotated and placed on the floor.
fn cornell_boxes(white: &Arc<dyn Material>) -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let tall: Arc<dyn Hittable> = Arc::new(Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()));
    let tall: Arc<dyn Hittable> =
        Arc::new(Translate::new(Arc::new(RotateY::new(tall, 15.0)), Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white.clone()));
    let short: Arc<dyn Hittable> =
        Arc::new(Translate::new(Arc::new(RotateY::new(short, -18.0)), Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_camera() -> Camera {
    camera(300, 300, Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), 40.0)
}

fn cornell_box(rng: &mut StdRng) -> Result<Scene> {
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut objects = cornell_walls(&white);
    objects.push(Arc::new(AxisAlignedRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, light)));

    let (tall, short) = cornell_boxes(&white);
    objects.push(tall);
    objects.push(short);

    Ok(Scene {
        world: BvhNode::build(objects, 0.0, 1.0, rng)?,
        camera: cornell_camera(),
        background: Background::Solid(Color::ZERO),
    })
}

fn cornell_smoke(rng: &mut StdRng) -> Result<Scene> {
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(7.0)));

    let mut objects = cornell_walls(&white);
    objects.push(Arc::new(AxisAlignedRect::xz(113.0, 443.0, 127.0, 432.0, 554.0, light)));

    let (tall, short) = cornell_boxes(&white);
    objects.push(Arc::new(ConstantMedium::with_color(tall, 0.01, Color::ZERO)));
    objects.push(Arc::new(ConstantMedium::with_color(short, 0.01, Color::ONE)));

    Ok(Scene {
        world: BvhNode::build(objects, 0.0, 1.0, rng)?,
        camera: cornell_camera(),
        background: Background::Solid(Color::ZERO),
    })
}

fn earth(texture_path: &str, rng: &mut StdRng) -> Result<Scene> {
    let surface: Arc<dyn Material> = Arc::new(Lambertian::with_texture(image_texture(texture_path)));
    let globe: Vec<Arc<dyn Hittable>> = vec![Arc::new(Sphere::new(Vec3::ZERO, 2.0, surface))];

    Ok(Scene {
        world: BvhNode::build(globe, 0.0, 1.0, rng)?,
        camera: camera(400, 225, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        background: Background::Solid(SKY),
    })
}

/// Everything at once: a field of boxes, a moving sphere, glass, brushed
/// metal, subsurface and global fog, the textured globe, marble, and a
/// rotated cluster of spheres.
fn final_scene(texture_path: &str, rng: &mut StdRng) -> Result<Scene> {
    const BOXES_PER_SIDE: i32 = 20;
    const BOX_WIDTH: f32 = 100.0;

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.48, 0.83, 0.53)));
    let mut boxes = HittableList::new();
    for i in 0..BOXES_PER_SIDE {
        for j in 0..BOXES_PER_SIDE {
            let x0 = -1000.0 + i as f32 * BOX_WIDTH;
            let z0 = -1000.0 + j as f32 * BOX_WIDTH;
            let y1 = gen_range(rng, 1.0, 101.0);
            boxes.add(Arc::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + BOX_WIDTH, y1, z0 + BOX_WIDTH),
                ground.clone(),
            )));
        }
    }
    log::info!("Final scene ground: {} boxes", boxes.len());

    let mut objects = HittableList::new();
    objects.add(Arc::new(BvhNode::from_list(&boxes, 0.0, 1.0, rng)?));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(7.0)));
    objects.add(Arc::new(AxisAlignedRect::xz(123.0, 423.0, 147.0, 412.0, 554.0, light)));

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    let orange: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.1)));
    objects.add(Arc::new(MovingSphere::new(center0, center1, 0.0, 1.0, 50.0, orange)));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    objects.add(Arc::new(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, glass.clone())));
    objects.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass shell filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(360.0, 150.0, 145.0), 70.0, glass.clone()));
    objects.add(boundary.clone());
    objects.add(Arc::new(ConstantMedium::with_color(boundary, 0.2, Color::new(0.2, 0.4, 0.9))));

    // Thin mist over the whole scene
    let haze: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 5000.0, glass));
    objects.add(Arc::new(ConstantMedium::with_color(haze, 0.0001, Color::ONE)));

    let globe: Arc<dyn Material> = Arc::new(Lambertian::with_texture(image_texture(texture_path)));
    objects.add(Arc::new(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, globe)));

    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(0.1, rng));
    objects.add(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::with_texture(pertext)),
    )));

    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let cluster: Vec<Arc<dyn Hittable>> = (0..1000)
        .map(|_| Arc::new(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, white.clone())) as Arc<dyn Hittable>)
        .collect();
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::build(cluster, 0.0, 1.0, rng)?);
    objects.add(Arc::new(Translate::new(
        Arc::new(RotateY::new(cluster, 15.0)),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    Ok(Scene {
        world: BvhNode::from_list(&objects, 0.0, 1.0, rng)?,
        camera: camera(300, 300, Vec3::new(478.0, 278.0, -600.0), Vec3::new(278.0, 278.0, 0.0), 40.0),
        background: Background::Solid(Color::ZERO),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{Interval, Ray};

    #[test]
    fn test_cornell_walls_face_into_the_room() {
        let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
        let walls = HittableList::from(cornell_walls(&white));
        let mut rng = StdRng::seed_from_u64(7);

        let rays = [
            (Vec3::new(278.0, 500.0, 0.0), Vec3::Z),   // back
            (Vec3::new(278.0, 500.0, 200.0), Vec3::X), // green
            (Vec3::new(278.0, 500.0, 200.0), -Vec3::X), // red
            (Vec3::new(50.0, 400.0, 50.0), Vec3::Y),   // ceiling
            (Vec3::new(50.0, 100.0, 50.0), -Vec3::Y),  // floor
        ];
        for (origin, direction) in rays {
            let rec = walls
                .hit(&Ray::new_simple(origin, direction), Interval::from_min(0.001), &mut rng)
                .unwrap();
            assert!(rec.front_face, "wall hit along {direction} faces away");
        }
    }

    #[test]
    fn test_final_scene_builds_without_texture() {
        let mut rng = StdRng::seed_from_u64(0);
        let scene = final_scene("no/such/earthmap.jpg", &mut rng).unwrap();

        let bbox = scene.world.bounding_box(0.0, 1.0).unwrap();
        assert!(bbox.is_finite());
        // The haze boundary dominates the extent
        assert!(bbox.min().x <= -5000.0 && bbox.max().y >= 5000.0);
        assert_eq!(scene.background, Background::Solid(Color::ZERO));
    }

    #[test]
    fn test_random_spheres_scene_is_hit_from_camera() {
        let mut rng = StdRng::seed_from_u64(0);
        let scene = random_spheres(&mut rng).unwrap();

        let ray = scene.camera.get_ray(0.5, 0.5, &mut rng);
        assert!(scene.world.hit(&ray, Interval::from_min(0.001), &mut rng).is_some());
    }
}
