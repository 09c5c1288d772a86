/// `.geo` mesh parser
///
/// A file holds any number of objects. Each object is a vertex count, that
/// many `x y z` triples, a face count, then that many 1-based vertex index
/// triples. Tokens are separated by arbitrary whitespace.
use log::info;
use nom::{
    character::complete::{multispace0, u32 as parse_u32},
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::LoadError;
use crate::geometry::Point;
use crate::scene::Object3D;
use crate::vector::Vec3;

/// Alternating slots along the X axis: 0, 1, -1, 2, -2, ...
///
/// Consecutive objects are laid out side by side around the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    slot: i32,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot the next object goes to, without consuming it.
    pub fn peek(&self) -> i32 {
        self.slot
    }
}

impl Iterator for Placement {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let slot = self.slot;
        self.slot = if slot <= 0 { 1 - slot } else { -slot };
        Some(slot)
    }
}

/// Parse every object in `text`, placing each at the origin.
pub fn parse_geo(text: &str) -> Result<Vec<Object3D>, LoadError> {
    let mut objects = Vec::new();
    let mut input = text;

    loop {
        let (rest, _) = skip_space(input);
        if rest.is_empty() {
            break;
        }
        let name = format!("object {}", objects.len() + 1);
        let (rest, object) = parse_object(text, rest, name)?;
        objects.push(object);
        input = rest;
    }

    Ok(objects)
}

/// Parse `text` and lay its objects out along X, `spacing` apart per slot.
///
/// Objects are named after `source` and their rank within it.
pub fn load_geo(
    source: &str,
    text: &str,
    placement: &mut Placement,
    spacing: f32,
) -> Result<Vec<Object3D>, LoadError> {
    let mut objects = parse_geo(text)?;
    for (i, (object, slot)) in objects.iter_mut().zip(placement.by_ref()).enumerate() {
        object.set_name(format!("{source}#{i}"));
        object.set_position(Point::new(slot as f32 * spacing, 0.0, 0.0));
    }
    info!("loaded {} objects from {source}", objects.len());
    Ok(objects)
}

fn skip_space(input: &str) -> (&str, &str) {
    multispace0::<&str, nom::error::Error<&str>>(input).unwrap_or((input, ""))
}

fn parse_object<'a>(
    source: &'a str,
    input: &'a str,
    name: String,
) -> Result<(&'a str, Object3D), LoadError> {
    let mut object = Object3D::new(name, Point::origin());

    let (mut input, vertex_count) = token(source, input, parse_count, "expected a vertex count")?;
    for _ in 0..vertex_count {
        let (rest, (x, y, z)) = token(source, input, parse_vector3, "expected three vertex coordinates")?;
        // nom's float also accepts nan and inf.
        if Vec3::checked([x, y, z]).is_none() {
            let (at, _) = skip_space(input);
            return Err(LoadError::parse(offset(source, at), "vertex coordinates must be finite"));
        }
        object.add_vertex(x, y, z);
        input = rest;
    }

    let (mut input, face_count) = token(source, input, parse_count, "expected a face count")?;
    for _ in 0..face_count {
        let (rest, indices) = token(source, input, parse_indices, "expected three vertex indices")?;
        let [i1, i2, i3] = indices.map(|i| i as usize);
        if [i1, i2, i3].contains(&0) {
            return Err(LoadError::parse(offset(source, input), "vertex indices start at 1"));
        }
        object.add_face(i1 - 1, i2 - 1, i3 - 1)?;
        input = rest;
    }

    Ok((input, object))
}

/// Run `parser`, turning a failure into a parse error at its byte offset in `source`.
fn token<'a, O>(
    source: &'a str,
    input: &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    message: &str,
) -> Result<(&'a str, O), LoadError> {
    parser(input).map_err(|e| {
        let at = match &e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
            nom::Err::Incomplete(_) => "",
        };
        LoadError::parse(offset(source, at), message)
    })
}

fn offset(source: &str, rest: &str) -> usize {
    source.len() - rest.len()
}

fn parse_count(input: &str) -> IResult<&str, u32> {
    preceded(multispace0, parse_u32)(input)
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace0, float)(input)?;
    let (input, z) = preceded(multispace0, float)(input)?;
    Ok((input, (x, y, z)))
}

fn parse_indices(input: &str) -> IResult<&str, [u32; 3]> {
    let (input, i1) = preceded(multispace0, parse_u32)(input)?;
    let (input, i2) = preceded(multispace0, parse_u32)(input)?;
    let (input, i3) = preceded(multispace0, parse_u32)(input)?;
    Ok((input, [i1, i2, i3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use pretty_assertions::assert_eq;

    const TETRA: &str = "4
0 0 0
1 0 0
0 1 0
0 0 1
4
1 3 2
1 2 4
1 4 3
2 3 4
";

    #[test]
    fn test_placement_alternates() {
        let slots: Vec<i32> = Placement::new().take(6).collect();
        assert_eq!(slots, vec![0, 1, -1, 2, -2, 3]);
    }

    #[test]
    fn test_parse_single_object() {
        let objects = parse_geo(TETRA).unwrap();
        assert_eq!(objects.len(), 1);
        let tetra = &objects[0];
        assert_eq!(tetra.num_vertices(), 4);
        assert_eq!(tetra.faces(), &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]);
        assert_eq!(tetra.vertices()[3], Point::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_several_objects_on_one_line() {
        let text = "3 0 0 0 1 0 0 0 1 0 1 1 2 3   3 -1.5 0 0 2.5e0 0 0 0 1 0 1 1 2 3";
        let objects = parse_geo(text).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].vertices()[0], Point::new(-1.5, 0.0, 0.0));
        assert_eq!(objects[1].vertices()[1], Point::new(2.5, 0.0, 0.0));
        assert_eq!(objects[1].name(), "object 2");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_geo("").unwrap().is_empty());
        assert!(parse_geo("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_truncated_input() {
        let err = parse_geo("3 0 0 0 1 0").unwrap_err();
        match err {
            LoadError::Parse { offset, message } => {
                assert_eq!(offset, 11);
                assert_eq!(message, "expected three vertex coordinates");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_coordinates() {
        for text in ["3 nan 0 0 1 0 0 0 1 0 1 1 2 3", "3 0 0 0 inf 0 0 0 1 0 1 1 2 3"] {
            match parse_geo(text).unwrap_err() {
                LoadError::Parse { message, .. } => {
                    assert_eq!(message, "vertex coordinates must be finite");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        let err = parse_geo("3 0 0 0 inf 0 0 0 1 0 1 1 2 3").unwrap_err();
        assert!(matches!(err, LoadError::Parse { offset: 8, .. }));
    }

    #[test]
    fn test_bad_index() {
        let err = parse_geo("3 0 0 0 1 0 0 0 1 0 1 1 2 4").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Geometry(GeometryError::FaceIndex { index: 3, vertices: 3 })
        ));

        let err = parse_geo("3 0 0 0 1 0 0 0 1 0 1 0 1 2").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_load_geo_places_objects() {
        let text = format!("{TETRA}{TETRA}{TETRA}");
        let mut placement = Placement::new();
        let objects = load_geo("tetra.geo", &text, &mut placement, 0.5).unwrap();
        let xs: Vec<f32> = objects.iter().map(|o| o.position().x()).collect();
        assert_eq!(xs, vec![0.0, 0.5, -0.5]);
        assert_eq!(objects[2].name(), "tetra.geo#2");
        // The counter carries over to the next file.
        assert_eq!(placement.peek(), 2);
    }
}
