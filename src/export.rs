use crate::airfoil::AirfoilProfile;
use crate::config::WingDefinition;
use crate::errors::{ExportError, Result};
use crate::section::{generate_sections, PanelSettings, SectionTable, WingModel, WingSection};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Aircraft definition template bundled with the crate. Only the wing
/// position, the fin flag and the section list are rewritten on export;
/// everything else is copied through untouched.
const WING_TEMPLATE: &str = include_str!("../assets/wing.xml");

/// What an export produced: the section table that was computed and the
/// files that were written.
pub struct ExportSummary {
    pub xml_path: PathBuf,
    pub airfoil_paths: Vec<PathBuf>,
    pub table: SectionTable,
}

/// Run a complete export: build the guide-curve model, generate the
/// section table, write one `.dat` coordinate file per airfoil job and
/// finally the aircraft XML next to them.
///
/// The XML is written last, so a failure while blending airfoils (for
/// example a root/tip vertex-count mismatch) leaves no aircraft file
/// behind. Already-written `.dat` files are not removed on failure.
pub fn export_wing(
    def: &WingDefinition,
    panels: &PanelSettings,
    output: &Path,
) -> Result<ExportSummary> {
    let model = def.build_model()?;

    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output path has no file name",
            ))
        })?
        .to_string();
    let dir = output.parent().unwrap_or_else(|| Path::new(""));

    let table = generate_sections(&model, panels, &stem);

    let root_profile = def.root_airfoil.profile();
    let tip_profile = match &def.tip_airfoil {
        Some(tip) => tip.profile(),
        None => root_profile.clone(),
    };

    let mut airfoil_paths = Vec::with_capacity(table.airfoils.len());
    for job in &table.airfoils {
        let blended =
            AirfoilProfile::blend(&root_profile, &tip_profile, job.factor, job.thickness)?;
        let label = format!("{stem}{:04}", job.station);
        let path = dir.join(format!("{label}.dat"));
        write_dat_file(&path, &label, &blended)?;
        airfoil_paths.push(path);
    }

    let position = wing_position(def, &model);
    let xml = render_plane_xml(WING_TEMPLATE, &table.sections, &position, model.is_fin)?;
    let xml_path = dir.join(format!("{stem}.xml"));
    std::fs::write(&xml_path, xml)?;

    Ok(ExportSummary {
        xml_path,
        airfoil_paths,
        table,
    })
}

/// The wing placement written to the XML: the host object location in
/// XFlr5 axis order (y, x, z), with the leading-edge curve's root-station
/// height added as a vertical bias.
fn wing_position(def: &WingDefinition, model: &WingModel) -> String {
    let bias = model.leading.point_at_fraction(1.0).z;
    format!(
        "{0:.2}, {1:.2}, {2:.2}",
        def.location[1],
        def.location[0],
        def.location[2] + bias
    )
}

/// Write one airfoil coordinate file: a label line, then one "y z" pair
/// per profile vertex at 7 decimal places, in source vertex order.
fn write_dat_file(path: &Path, label: &str, profile: &AirfoilProfile) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{label}")?;
    for (y, z) in profile.points() {
        writeln!(file, "{y:.7} {z:.7}")?;
    }
    Ok(())
}

/// Stream-copy the template document, rewriting the wing's Position and
/// isFin values and replacing the whole Sections subtree with the computed
/// section rows. Fails if the template lacks the wing or Sections nodes.
fn render_plane_xml(
    template: &str,
    sections: &[WingSection],
    position: &str,
    is_fin: bool,
) -> Result<String> {
    let mut reader = Reader::from_str(template);
    let mut buffer = Vec::new();
    let mut writer = Writer::new(Cursor::new(&mut buffer));

    let mut in_wing = false;
    let mut found_wing = false;
    let mut found_sections = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) if !in_wing && e.name().as_ref() == b"wing" => {
                in_wing = true;
                found_wing = true;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) if in_wing && e.name().as_ref() == b"wing" => {
                in_wing = false;
                writer.write_event(Event::End(e))?;
            }
            Event::Start(e) if in_wing && e.name().as_ref() == b"Position" => {
                writer.write_event(Event::Start(e.clone()))?;
                reader.read_to_end(e.name())?;
                writer.write_event(Event::Text(BytesText::new(position)))?;
                writer.write_event(Event::End(BytesEnd::new("Position")))?;
            }
            Event::Start(e) if in_wing && e.name().as_ref() == b"isFin" => {
                writer.write_event(Event::Start(e.clone()))?;
                reader.read_to_end(e.name())?;
                let text = if is_fin { "true" } else { "false" };
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new("isFin")))?;
            }
            Event::Start(e) if in_wing && e.name().as_ref() == b"Sections" => {
                found_sections = true;
                writer.write_event(Event::Start(e.clone()))?;
                reader.read_to_end(e.name())?;
                for section in sections {
                    write_section(&mut writer, section)?;
                }
                writer.write_event(Event::End(BytesEnd::new("Sections")))?;
            }
            event => writer.write_event(event)?,
        }
    }

    if !found_wing {
        return Err(ExportError::TemplateMissingNode("wing"));
    }
    if !found_sections {
        return Err(ExportError::TemplateMissingNode("Sections"));
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_section<W: Write>(writer: &mut Writer<W>, section: &WingSection) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Section")))?;

    write_text_element(writer, "y_position", &format!("{:.3}", section.y_position))?;
    write_text_element(writer, "Chord", &format!("{:.3}", section.chord))?;
    write_text_element(writer, "xOffset", &format!("{:.3}", section.x_offset))?;
    write_text_element(writer, "Dihedral", &format!("{:.3}", section.dihedral))?;
    write_text_element(writer, "Twist", &format!("{:.3}", section.twist))?;
    write_text_element(
        writer,
        "x_number_of_panels",
        &section.x_panels.to_string(),
    )?;
    write_text_element(writer, "x_panel_distribution", section.x_distribution)?;
    write_text_element(
        writer,
        "y_number_of_panels",
        &section.y_panels.to_string(),
    )?;
    write_text_element(writer, "y_panel_distribution", section.y_distribution)?;
    write_text_element(writer, "Left_Side_FoilName", &section.left_foil)?;
    write_text_element(writer, "Right_Side_FoilName", &section.right_foil)?;

    writer.write_event(Event::End(BytesEnd::new("Section")))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
