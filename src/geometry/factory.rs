// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Procedural base shapes.
//!
//! All functions append into an existing [`Geometry`] so shapes can be
//! composed. Most shapes leave normals at zero; run
//! [`Geometry::calculate_triangle_normals`] afterwards for lit rendering.
//! Shapes offering `as_triangles = false` emit their wireframe as lines
//! instead.

use nalgebra::{Point3, Vector3};

use crate::utils::math;

use super::Geometry;

/// Flat quad in the XY plane, centered on the origin
pub fn create_quad(g: &mut Geometry, size_x: f32, size_y: f32, as_triangles: bool) {
    let sx = size_x * 0.5;
    let sy = size_y * 0.5;
    let n = Vector3::new(0.0, 0.0, -1.0);

    g.set_tex_coord(0.0, 0.0);
    let bl = g.add_vertex(Point3::new(-sx, -sy, 0.0), n);
    g.set_tex_coord(1.0, 0.0);
    let br = g.add_vertex(Point3::new(sx, -sy, 0.0), n);
    g.set_tex_coord(0.0, 1.0);
    let tl = g.add_vertex(Point3::new(-sx, sy, 0.0), n);
    g.set_tex_coord(1.0, 1.0);
    let tr = g.add_vertex(Point3::new(sx, sy, 0.0), n);

    if as_triangles {
        g.add_triangle(tr, tl, bl);
        g.add_triangle(tr, bl, br);
    } else {
        g.add_line(bl, br);
        g.add_line(bl, tl);
        g.add_line(br, tr);
        g.add_line(tl, tr);
    }
}

/// Cube with side length `side`
pub fn create_cube(g: &mut Geometry, side: f32, as_triangles: bool) {
    create_box(g, side, side, side, as_triangles, Vector3::zeros());
}

/// Axis-aligned box around `offset` with shared corner vertices
pub fn create_box(
    g: &mut Geometry,
    size_x: f32,
    size_y: f32,
    size_z: f32,
    as_triangles: bool,
    offset: Vector3<f32>,
) {
    let sx = size_x * 0.5;
    let sy = size_y * 0.5;
    let sz = size_z * 0.5;
    let o = offset;
    let n = Vector3::zeros();

    g.set_tex_coord(0.0, 0.0);
    let fbl = g.add_vertex(Point3::new(-sx + o.x, -sy + o.y, sz + o.z), n);
    g.set_tex_coord(1.0, 0.0);
    let fbr = g.add_vertex(Point3::new(sx + o.x, -sy + o.y, sz + o.z), n);
    g.set_tex_coord(1.0, 1.0);
    let ftr = g.add_vertex(Point3::new(sx + o.x, sy + o.y, sz + o.z), n);
    g.set_tex_coord(0.0, 1.0);
    let ftl = g.add_vertex(Point3::new(-sx + o.x, sy + o.y, sz + o.z), n);

    g.set_tex_coord(0.0, 1.0);
    let bbl = g.add_vertex(Point3::new(-sx + o.x, -sy + o.y, -sz + o.z), n);
    g.set_tex_coord(1.0, 1.0);
    let bbr = g.add_vertex(Point3::new(sx + o.x, -sy + o.y, -sz + o.z), n);
    g.set_tex_coord(1.0, 0.0);
    let btr = g.add_vertex(Point3::new(sx + o.x, sy + o.y, -sz + o.z), n);
    g.set_tex_coord(0.0, 0.0);
    let btl = g.add_vertex(Point3::new(-sx + o.x, sy + o.y, -sz + o.z), n);

    if as_triangles {
        // front
        g.add_triangle(ftr, ftl, fbl);
        g.add_triangle(ftr, fbl, fbr);
        // right
        g.add_triangle(ftr, fbr, btr);
        g.add_triangle(fbr, bbr, btr);
        // back
        g.add_triangle(btr, bbr, btl);
        g.add_triangle(btl, bbr, bbl);
        // left
        g.add_triangle(ftl, btl, bbl);
        g.add_triangle(ftl, bbl, fbl);
        // top
        g.add_triangle(ftr, btr, btl);
        g.add_triangle(ftr, btl, ftl);
        // bottom
        g.add_triangle(fbr, fbl, bbl);
        g.add_triangle(fbr, bbl, bbr);
    } else {
        g.add_line(fbl, fbr);
        g.add_line(fbl, ftl);
        g.add_line(fbr, ftr);
        g.add_line(ftl, ftr);
        g.add_line(bbl, bbr);
        g.add_line(bbl, btl);
        g.add_line(bbr, btr);
        g.add_line(btl, btr);
        g.add_line(fbl, bbl);
        g.add_line(ftl, btl);
        g.add_line(fbr, bbr);
        g.add_line(ftr, btr);
    }
}

/// Box with per-face texture coordinates. Every face gets private vertices
/// so the seams stay sharp.
pub fn create_textured_box(
    g: &mut Geometry,
    size_x: f32,
    size_y: f32,
    size_z: f32,
    offset: Vector3<f32>,
) {
    let sx = size_x * 0.5;
    let sy = size_y * 0.5;
    let sz = size_z * 0.5;
    let o = offset;

    // corner sign table per face, quad order bottom-left .. top-left
    let faces: [[[f32; 3]; 4]; 6] = [
        // back
        [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
        // bottom
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
        // top
        [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
        // right
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
        // left
        [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
        // front
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    ];
    let uvs: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for face in &faces {
        let mut idx = [0u32; 4];
        for (k, corner) in face.iter().enumerate() {
            g.set_tex_coord(uvs[k][0], uvs[k][1]);
            idx[k] = g.add_vertex_always(
                Point3::new(
                    corner[0] * sx + o.x,
                    corner[1] * sy + o.y,
                    corner[2] * sz + o.z,
                ),
                Vector3::zeros(),
            );
        }
        g.add_triangle(idx[0], idx[1], idx[2]);
        g.add_triangle(idx[0], idx[2], idx[3]);
    }
}

/// Line grid in the XZ plane with optional coordinate axis markers
pub fn create_grid_xz(g: &mut Geometry, size_x: i32, size_z: i32, coords: bool) {
    let n = Vector3::zeros();

    g.set_color(0.5, 0.5, 0.5, 0.5);
    for i in -size_x..=size_x {
        let p1 = g.add_vertex(Point3::new(i as f32, 0.0, -size_z as f32), n);
        let p2 = g.add_vertex(Point3::new(i as f32, 0.0, size_z as f32), n);
        g.add_line(p1, p2);
    }
    for i in -size_z..=size_z {
        let p1 = g.add_vertex(Point3::new(-size_x as f32, 0.0, i as f32), n);
        let p2 = g.add_vertex(Point3::new(size_x as f32, 0.0, i as f32), n);
        g.add_line(p1, p2);
    }

    if !coords {
        return;
    }

    // coordinate axes, slightly above the plane, with tick markers
    const MARKER: f32 = 0.1;
    const LIFT: f32 = 0.01;

    g.set_color(1.0, 0.0, 0.0, 1.0);
    let p1 = g.add_vertex(Point3::new(0.0, LIFT, 0.0), n);
    let p2 = g.add_vertex(Point3::new(size_x as f32, LIFT, 0.0), n);
    g.add_line(p1, p2);
    for i in 1..size_x {
        let a = g.add_vertex(Point3::new(i as f32, LIFT - MARKER, 0.0), n);
        let b = g.add_vertex(Point3::new(i as f32, LIFT + MARKER, 0.0), n);
        g.add_line(a, b);
    }

    let size = size_x.min(size_z);
    g.set_color(0.0, 1.0, 0.0, 1.0);
    let p1 = g.add_vertex(Point3::new(0.0, LIFT, 0.0), n);
    let p2 = g.add_vertex(Point3::new(0.0, size as f32, 0.0), n);
    g.add_line(p1, p2);
    for i in 1..size {
        let a = g.add_vertex(Point3::new(-MARKER, i as f32, 0.0), n);
        let b = g.add_vertex(Point3::new(MARKER, i as f32, 0.0), n);
        g.add_line(a, b);
    }

    g.set_color(0.0, 0.0, 1.0, 1.0);
    let p1 = g.add_vertex(Point3::new(0.0, LIFT, 0.0), n);
    let p2 = g.add_vertex(Point3::new(0.0, LIFT, size_z as f32), n);
    g.add_line(p1, p2);
    for i in 1..size_z {
        let a = g.add_vertex(Point3::new(0.0, LIFT - MARKER, i as f32), n);
        let b = g.add_vertex(Point3::new(0.0, LIFT + MARKER, i as f32), n);
        g.add_line(a, b);
    }
}

/// 3D lattice of unit-spaced vertices connected to their axis neighbors
pub fn create_line_grid(g: &mut Geometry, size_x: i32, size_y: i32, size_z: i32) {
    let start = g.num_vertices() as u32;
    let sx = size_x.max(1);
    let sy = size_y.max(1);
    let sz = size_z.max(1);

    let ox = sx as f32 / 2.0 - 0.5;
    let oy = sy as f32 / 2.0 - 0.5;
    let oz = sz as f32 / 2.0 - 0.5;

    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                g.add_vertex(
                    Point3::new(x as f32 - ox, y as f32 - oy, z as f32 - oz),
                    Vector3::zeros(),
                );
            }
        }
    }

    let index = |x: i32, y: i32, z: i32| start + ((z * sy + y) * sx + x) as u32;

    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                if x > 0 {
                    g.add_line(index(x, y, z), index(x - 1, y, z));
                }
                if y > 0 {
                    g.add_line(index(x, y, z), index(x, y - 1, z));
                }
                if z > 0 {
                    g.add_line(index(x, y, z), index(x, y, z - 1));
                }
            }
        }
    }
}

/// UV sphere around `offset` with pole caps
pub fn create_uv_sphere(
    g: &mut Geometry,
    rad: f32,
    segu: u32,
    segv: u32,
    as_triangles: bool,
    offset: Vector3<f32>,
) {
    let segu = segu.max(3);
    let segv = segv.max(2);
    let o = offset;
    let zero = Vector3::zeros();

    if !as_triangles {
        create_uv_sphere_lines(g, rad, segu, segv);
        return;
    }

    g.set_tex_coord(0.0, 1.0);
    let top = g.add_vertex(Point3::new(o.x, o.y + rad, o.z), zero);

    for v in 1..segv {
        let rown = g.num_vertices() as u32;

        for u in 0..segu {
            let p = math::point_on_sphere(u as f32 / segu as f32, v as f32 / segv as f32);
            g.set_tex_coord(
                (u + 1) as f32 / (segu + 1) as f32,
                1.0 - (v + 1) as f32 / (segv + 1) as f32,
            );
            g.add_vertex(
                Point3::new(p.x * rad + o.x, p.y * rad + o.y, p.z * rad + o.z),
                zero,
            );
        }

        for u in 0..segu {
            if v == 1 {
                g.add_triangle(top, rown + u, rown + (u + 1) % segu);
            } else {
                g.add_triangle(rown - segu + u, rown + u, rown + (u + 1) % segu);
                g.add_triangle(
                    rown - segu + (u + 1) % segu,
                    rown - segu + u,
                    rown + (u + 1) % segu,
                );
            }
        }
    }

    let rown = g.num_vertices() as u32 - segu;
    g.set_tex_coord(0.0, 0.0);
    let bottom = g.add_vertex(Point3::new(o.x, o.y - rad, o.z), zero);

    for u in 0..segu {
        g.add_triangle(bottom, rown + (u + 1) % segu, rown + u);
    }
}

/// UV sphere wireframe around the origin
pub fn create_uv_sphere_lines(g: &mut Geometry, rad: f32, segu: u32, segv: u32) {
    let segu = segu.max(3);
    let segv = segv.max(2);
    let zero = Vector3::zeros();

    let top = g.add_vertex(Point3::new(0.0, rad, 0.0), zero);

    for v in 1..segv {
        let rown = g.num_vertices() as u32;

        for u in 0..segu {
            let p = math::point_on_sphere(u as f32 / segu as f32, v as f32 / segv as f32);
            g.add_vertex(Point3::new(p.x * rad, p.y * rad, p.z * rad), zero);
        }

        for u in 0..segu {
            if v == 1 {
                g.add_line(top, rown + u);
            } else {
                g.add_line(rown + u - segu, rown + u);
            }
            g.add_line(rown + u, rown + (u + 1) % segu);
        }
    }

    let rown = g.num_vertices() as u32 - segu;
    let bottom = g.add_vertex(Point3::new(0.0, -rad, 0.0), zero);

    for u in 0..segu {
        g.add_line(bottom, rown + u);
    }
}

/// Partial sphere covering `coverage` degrees from the top pole
pub fn create_dome(
    g: &mut Geometry,
    rad: f32,
    coverage: f32,
    segu: u32,
    segv: u32,
    as_triangles: bool,
) {
    let segu = segu.max(3);
    let segv = segv.max(2);
    let zero = Vector3::zeros();

    g.set_tex_coord(0.0, 1.0);
    let top = g.add_vertex(Point3::new(0.0, rad, 0.0), zero);

    for v in 1..segv {
        let rown = g.num_vertices() as u32;

        for u in 0..segu {
            let p = math::point_on_sphere(
                u as f32 / segu as f32,
                v as f32 * coverage / 360.0 / (segv - 1) as f32,
            );
            g.set_tex_coord(
                (u + 1) as f32 / (segu + 1) as f32,
                1.0 - (v + 1) as f32 / (segv + 1) as f32,
            );
            g.add_vertex(Point3::new(p.x * rad, p.y * rad, p.z * rad), zero);
        }

        for u in 0..segu {
            if as_triangles {
                if v == 1 {
                    g.add_triangle(top, rown + u, rown + (u + 1) % segu);
                } else {
                    g.add_triangle(rown - segu + u, rown + u, rown + (u + 1) % segu);
                    g.add_triangle(
                        rown - segu + (u + 1) % segu,
                        rown - segu + u,
                        rown + (u + 1) % segu,
                    );
                }
            } else {
                if v == 1 {
                    g.add_line(top, rown + u);
                } else {
                    g.add_line(rown + u - segu, rown + u);
                }
                g.add_line(rown + u, rown + (u + 1) % segu);
            }
        }
    }
}

/// Cylinder along the Y axis, optionally capped
pub fn create_cylinder(
    g: &mut Geometry,
    rad: f32,
    height: f32,
    segu: u32,
    segv: u32,
    open: bool,
    as_triangles: bool,
) {
    let segu = segu.max(3);
    let segv = segv.max(2);
    let zero = Vector3::zeros();

    let start = g.num_vertices() as u32;

    for y in 0..segv {
        let ty = y as f32 / (segv - 1) as f32;
        for x in 0..segu {
            let tx = x as f32 / (segu - 1) as f32;
            let a = x as f32 / segu as f32 * std::f32::consts::TAU;
            g.set_tex_coord(tx, ty);
            g.add_vertex(
                Point3::new(rad * a.sin(), (ty - 0.5) * height, rad * a.cos()),
                zero,
            );
        }
    }

    let half = height / 2.0;

    if !as_triangles {
        for y in 0..segv {
            for x in 0..segu {
                g.add_line(start + y * segu + x, start + y * segu + (x + 1) % segu);
                if y > 0 {
                    g.add_line(start + (y - 1) * segu + x, start + y * segu + x);
                }
            }
        }
        if !open {
            let cap = g.num_vertices() as u32;
            g.set_tex_coord(0.0, 0.0);
            g.add_vertex(Point3::new(0.0, -half, 0.0), zero);
            for x in 0..segu {
                g.add_line(cap, start + x);
            }
            let cap = g.num_vertices() as u32;
            g.set_tex_coord(0.0, 1.0);
            g.add_vertex(Point3::new(0.0, half, 0.0), zero);
            for x in 0..segu {
                g.add_line(cap, start + (segv - 1) * segu + x);
            }
        }
    } else {
        for y in 0..segv - 1 {
            for x in 0..segu {
                g.add_triangle(
                    start + y * segu + x,
                    start + y * segu + (x + 1) % segu,
                    start + (y + 1) * segu + (x + 1) % segu,
                );
                g.add_triangle(
                    start + y * segu + x,
                    start + (y + 1) * segu + (x + 1) % segu,
                    start + (y + 1) * segu + x,
                );
            }
        }
        if !open {
            let cap = g.num_vertices() as u32;
            g.set_tex_coord(0.0, 0.0);
            g.add_vertex(Point3::new(0.0, -half, 0.0), zero);
            for x in 0..segu {
                g.add_triangle(cap, start + (x + 1) % segu, start + x);
            }
            let cap = g.num_vertices() as u32;
            g.set_tex_coord(0.0, 1.0);
            g.add_vertex(Point3::new(0.0, half, 0.0), zero);
            for x in 0..segu {
                g.add_triangle(
                    cap,
                    start + (segv - 1) * segu + x,
                    start + (segv - 1) * segu + (x + 1) % segu,
                );
            }
        }
    }
}

/// Torus around the Y axis with outer ring radius `rad_out` and tube
/// radius `rad_in`
pub fn create_torus(
    g: &mut Geometry,
    rad_out: f32,
    rad_in: f32,
    segu: u32,
    segv: u32,
    as_triangles: bool,
    offset: Vector3<f32>,
) {
    let segu = segu.max(3);
    let segv = segv.max(3);
    let zero = Vector3::zeros();

    let mut verts: Vec<u32> = Vec::with_capacity((segu * segv) as usize);

    for y in 0..segv {
        let ty = y as f32 / (segv - 1) as f32;
        let ang = y as f32 / segv as f32 * 360.0;

        for x in 0..segu {
            let tx = x as f32 / (segu - 1) as f32;
            let a = x as f32 / segu as f32 * std::f32::consts::TAU;

            let v = math::rotate_y(
                Vector3::new(rad_out + rad_in * a.sin(), rad_in * a.cos(), 0.0),
                ang,
            ) + offset;

            g.set_tex_coord(tx, ty);
            verts.push(g.add_vertex(Point3::from(v), zero));
        }
    }

    let at = |y: u32, x: u32| verts[(y * segu + x) as usize];

    for y in 0..segv {
        for x in 0..segu {
            if as_triangles {
                g.add_triangle(
                    at(y, x),
                    at(y, (x + 1) % segu),
                    at((y + 1) % segv, (x + 1) % segu),
                );
                g.add_triangle(
                    at(y, x),
                    at((y + 1) % segv, (x + 1) % segu),
                    at((y + 1) % segv, x),
                );
            } else {
                g.add_line(at(y, x), at(y, (x + 1) % segu));
                g.add_line(at(y, x), at((y + 1) % segv, x));
            }
        }
    }
}

/// Regular tetrahedron
pub fn create_tetrahedron(g: &mut Geometry, scale: f32, as_triangles: bool) {
    let a = 0.5 * scale;
    let zero = Vector3::zeros();

    let p0 = g.add_vertex(Point3::new(-a, a, a), zero);
    let p1 = g.add_vertex(Point3::new(a, a, -a), zero);
    let p2 = g.add_vertex(Point3::new(-a, -a, -a), zero);
    let p3 = g.add_vertex(Point3::new(a, -a, a), zero);

    if as_triangles {
        g.add_triangle(p0, p1, p2);
        g.add_triangle(p0, p3, p1);
        g.add_triangle(p0, p2, p3);
        g.add_triangle(p1, p3, p2);
    } else {
        g.add_line(p0, p1);
        g.add_line(p0, p2);
        g.add_line(p0, p3);
        g.add_line(p1, p2);
        g.add_line(p1, p3);
        g.add_line(p2, p3);
    }
}

/// Regular octahedron
pub fn create_octahedron(g: &mut Geometry, scale: f32, as_triangles: bool) {
    let a = 0.5 * scale / (2.0 * 2.0_f32.sqrt()).sqrt();
    let b = 0.5 * scale;
    let zero = Vector3::zeros();

    let p0 = g.add_vertex(Point3::new(0.0, b, 0.0), zero);
    let p1 = g.add_vertex(Point3::new(-a, 0.0, a), zero);
    let p2 = g.add_vertex(Point3::new(a, 0.0, a), zero);
    let p3 = g.add_vertex(Point3::new(a, 0.0, -a), zero);
    let p4 = g.add_vertex(Point3::new(-a, 0.0, -a), zero);
    let p5 = g.add_vertex(Point3::new(0.0, -b, 0.0), zero);

    if as_triangles {
        g.add_triangle(p0, p1, p2);
        g.add_triangle(p0, p2, p3);
        g.add_triangle(p0, p3, p4);
        g.add_triangle(p0, p4, p1);
        g.add_triangle(p5, p2, p1);
        g.add_triangle(p5, p3, p2);
        g.add_triangle(p5, p4, p3);
        g.add_triangle(p5, p1, p4);
    } else {
        g.add_line(p0, p1);
        g.add_line(p0, p2);
        g.add_line(p0, p3);
        g.add_line(p0, p4);
        g.add_line(p1, p2);
        g.add_line(p1, p4);
        g.add_line(p1, p5);
        g.add_line(p2, p3);
        g.add_line(p2, p5);
        g.add_line(p3, p4);
        g.add_line(p3, p5);
        g.add_line(p4, p5);
    }
}

/// Regular icosahedron
pub fn create_icosahedron(g: &mut Geometry, scale: f32, as_triangles: bool) {
    let a = 0.5 * scale;
    let b = scale / (1.0 + 5.0_f32.sqrt());
    let zero = Vector3::zeros();

    let p = [
        g.add_vertex(Point3::new(0.0, b, -a), zero),
        g.add_vertex(Point3::new(b, a, 0.0), zero),
        g.add_vertex(Point3::new(-b, a, 0.0), zero),
        g.add_vertex(Point3::new(0.0, b, a), zero),
        g.add_vertex(Point3::new(0.0, -b, a), zero),
        g.add_vertex(Point3::new(-a, 0.0, b), zero),
        g.add_vertex(Point3::new(0.0, -b, -a), zero),
        g.add_vertex(Point3::new(a, 0.0, -b), zero),
        g.add_vertex(Point3::new(a, 0.0, b), zero),
        g.add_vertex(Point3::new(-a, 0.0, -b), zero),
        g.add_vertex(Point3::new(b, -a, 0.0), zero),
        g.add_vertex(Point3::new(-b, -a, 0.0), zero),
    ];

    if as_triangles {
        const TRIS: [[usize; 3]; 20] = [
            [0, 2, 1],
            [3, 1, 2],
            [3, 5, 4],
            [3, 4, 8],
            [0, 7, 6],
            [0, 6, 9],
            [4, 11, 10],
            [6, 10, 11],
            [2, 9, 5],
            [11, 5, 9],
            [1, 8, 7],
            [10, 7, 8],
            [3, 2, 5],
            [3, 8, 1],
            [0, 9, 2],
            [0, 1, 7],
            [6, 11, 9],
            [6, 7, 10],
            [4, 5, 11],
            [4, 10, 8],
        ];
        for [i, j, k] in TRIS {
            g.add_triangle(p[i], p[j], p[k]);
        }
    } else {
        const LINES: [[usize; 2]; 30] = [
            [0, 1],
            [0, 2],
            [0, 6],
            [0, 7],
            [0, 9],
            [1, 2],
            [1, 3],
            [1, 7],
            [1, 8],
            [2, 3],
            [2, 5],
            [2, 9],
            [3, 4],
            [3, 5],
            [3, 8],
            [4, 5],
            [4, 8],
            [4, 10],
            [4, 11],
            [5, 9],
            [5, 11],
            [6, 7],
            [6, 9],
            [6, 10],
            [6, 11],
            [7, 8],
            [7, 10],
            [8, 10],
            [9, 11],
            [10, 11],
        ];
        for [i, j] in LINES {
            g.add_line(p[i], p[j]);
        }
    }
}
