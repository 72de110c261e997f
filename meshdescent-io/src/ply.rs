//! PLY format support

use crate::{triangulate_fan, MeshReader, MeshWriter};
use meshdescent_core::{Error, MeshSource, Point3f, Result, TriangleMesh, Vector3f};
use ply_rs::{
    parser::Parser,
    ply::{Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType},
    writer::Writer,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub struct PlyReader;
pub struct PlyWriter;

impl MeshReader for PlyReader {
    fn read_source<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::load(path, e))?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(&mut reader)
            .map_err(|e| Error::load(path, e))?;

        ply_to_mesh(&ply)
            .map(MeshSource::Single)
            .map_err(|e| Error::load(path, e))
    }
}

impl MeshWriter for PlyWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::export(path, e))?;
        let mut writer = BufWriter::new(file);

        let mut ply = mesh_to_ply(mesh);
        Writer::new()
            .write_ply(&mut writer, &mut ply)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::export(path, e))
    }
}

fn ply_to_mesh(ply: &Ply<DefaultElement>) -> Result<TriangleMesh> {
    let vertex_elements = ply.payload.get("vertex").map(Vec::as_slice).unwrap_or(&[]);

    let mut vertices = Vec::with_capacity(vertex_elements.len());
    for vertex in vertex_elements {
        let x = extract_property_value(vertex, "x")?;
        let y = extract_property_value(vertex, "y")?;
        let z = extract_property_value(vertex, "z")?;
        vertices.push(Point3f::new(x, y, z));
    }

    let mut faces = Vec::new();
    if let Some(face_elements) = ply.payload.get("face") {
        for face in face_elements {
            let indices = extract_face_indices(face)?;
            if let Some(&bad) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(Error::InvalidData(format!(
                    "Face references vertex {} but only {} exist",
                    bad,
                    vertices.len()
                )));
            }
            faces.extend(triangulate_fan(&indices));
        }
    }

    // Normals are all-or-nothing
    let normals: Option<Vec<Vector3f>> = vertex_elements
        .iter()
        .map(|vertex| {
            Some(Vector3f::new(
                extract_property_value(vertex, "nx").ok()?,
                extract_property_value(vertex, "ny").ok()?,
                extract_property_value(vertex, "nz").ok()?,
            ))
        })
        .collect();

    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    if let Some(normals) = normals.filter(|n| !n.is_empty()) {
        mesh.set_normals(normals);
    }

    Ok(mesh)
}

fn mesh_to_ply(mesh: &TriangleMesh) -> Ply<DefaultElement> {
    let mut ply = Ply::<DefaultElement>::new();
    let normals = mesh
        .normals
        .as_ref()
        .filter(|n| n.len() == mesh.vertices.len());

    let mut vertex_element = ElementDef::new("vertex".to_string());
    vertex_element.count = mesh.vertices.len();
    let mut names = vec!["x", "y", "z"];
    if normals.is_some() {
        names.extend(["nx", "ny", "nz"]);
    }
    for name in names {
        vertex_element.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    ply.header.elements.add(vertex_element);

    let mut face_element = ElementDef::new("face".to_string());
    face_element.count = mesh.faces.len();
    face_element.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    ply.header.elements.add(face_element);

    let vertices = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, vertex)| {
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Float(vertex.x));
            element.insert("y".to_string(), Property::Float(vertex.y));
            element.insert("z".to_string(), Property::Float(vertex.z));
            if let Some(normals) = normals {
                element.insert("nx".to_string(), Property::Float(normals[i].x));
                element.insert("ny".to_string(), Property::Float(normals[i].y));
                element.insert("nz".to_string(), Property::Float(normals[i].z));
            }
            element
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertices);

    let faces = mesh
        .faces
        .iter()
        .map(|face| {
            let mut element = DefaultElement::new();
            let indices = face.iter().map(|&i| i as i32).collect();
            element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            element
        })
        .collect();
    ply.payload.insert("face".to_string(), faces);

    ply
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        Some(Property::Short(val)) => Ok(*val as f32),
        Some(Property::UShort(val)) => Ok(*val as f32),
        _ => Err(Error::InvalidData(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    let negative = || Error::InvalidData("Negative face index".to_string());
    match element.get("vertex_indices").or_else(|| element.get("vertex_index")) {
        Some(Property::ListInt(indices)) => indices
            .iter()
            .map(|&idx| usize::try_from(idx).map_err(|_| negative()))
            .collect(),
        Some(Property::ListUInt(indices)) => Ok(indices.iter().map(|&idx| idx as usize).collect()),
        Some(Property::ListUShort(indices)) => Ok(indices.iter().map(|&idx| idx as usize).collect()),
        Some(Property::ListUChar(indices)) => Ok(indices.iter().map(|&idx| idx as usize).collect()),
        _ => Err(Error::InvalidData("Face indices not found".to_string())),
    }
}
