//! Presentation template module.
//!
//! Provides the built-in blank 16:9 document used when no template is given:
//! one slide master, the eleven standard layouts, a theme and the usual
//! presentation-level property parts. Fixed parts are embedded as XML
//! resources; layouts are generated from [`DEFAULT_LAYOUTS`].

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use crate::ooxml::opc::error::OpcError;
use crate::ooxml::opc::{OpcPackage, PackURI, Part, XmlPart};
use crate::ooxml::pptx::format::Geometry;
use crate::ooxml::pptx::shapes::PlaceholderAttrs;
use std::fmt::Write as FmtWrite;

const PRESENTATION_XML: &str = include_str!("resources/presentation.xml");
const SLIDE_MASTER_XML: &str = include_str!("resources/slideMaster1.xml");
const NOTES_MASTER_XML: &str = include_str!("resources/notesMaster1.xml");
const THEME_XML: &str = include_str!("resources/theme1.xml");
const PRES_PROPS_XML: &str = include_str!("resources/presProps.xml");
const VIEW_PROPS_XML: &str = include_str!("resources/viewProps.xml");
const TABLE_STYLES_XML: &str = include_str!("resources/tableStyles.xml");
const CORE_XML: &str = include_str!("resources/core.xml");
const APP_XML: &str = include_str!("resources/app.xml");

/// A placeholder declared by a built-in layout.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderDef {
    pub type_code: Option<&'static str>,
    pub idx: u32,
    pub orient: Option<&'static str>,
    pub size: Option<&'static str>,
    pub name: &'static str,
    /// `None` inherits the master's geometry
    pub geometry: Option<Geometry>,
}

/// A built-in slide layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutDef {
    pub name: &'static str,
    /// `ST_SlideLayoutType` value
    pub layout_type: &'static str,
    pub placeholders: &'static [PlaceholderDef],
}

const fn ph(type_code: Option<&'static str>, idx: u32, name: &'static str) -> PlaceholderDef {
    PlaceholderDef {
        type_code,
        idx,
        orient: None,
        size: None,
        name,
        geometry: None,
    }
}

const fn at(mut def: PlaceholderDef, x: i64, y: i64, cx: i64, cy: i64) -> PlaceholderDef {
    def.geometry = Some(Geometry { x, y, cx, cy });
    def
}

const fn sized(mut def: PlaceholderDef, size: &'static str) -> PlaceholderDef {
    def.size = Some(size);
    def
}

const fn vertical(mut def: PlaceholderDef) -> PlaceholderDef {
    def.orient = Some("vert");
    def
}

const TITLE: PlaceholderDef = ph(Some("title"), 0, "Title 1");

/// The standard Office layouts, in master order.
pub const DEFAULT_LAYOUTS: [LayoutDef; 11] = [
    LayoutDef {
        name: "Title Slide",
        layout_type: "title",
        placeholders: &[
            at(ph(Some("ctrTitle"), 0, "Title 1"), 1524000, 1122363, 9144000, 2387600),
            at(ph(Some("subTitle"), 1, "Subtitle 2"), 1524000, 3602038, 9144000, 1655762),
        ],
    },
    LayoutDef {
        name: "Title and Content",
        layout_type: "obj",
        placeholders: &[TITLE, ph(None, 1, "Content Placeholder 2")],
    },
    LayoutDef {
        name: "Section Header",
        layout_type: "secHead",
        placeholders: &[
            at(TITLE, 831850, 1709738, 10515600, 2852737),
            at(ph(Some("body"), 1, "Text Placeholder 2"), 831850, 4589463, 10515600, 1500187),
        ],
    },
    LayoutDef {
        name: "Two Content",
        layout_type: "twoObj",
        placeholders: &[
            TITLE,
            at(sized(ph(None, 1, "Content Placeholder 2"), "half"), 838200, 1825625, 5181600, 4351338),
            at(sized(ph(None, 2, "Content Placeholder 3"), "half"), 6172200, 1825625, 5181600, 4351338),
        ],
    },
    LayoutDef {
        name: "Comparison",
        layout_type: "twoTxTwoObj",
        placeholders: &[
            at(TITLE, 839788, 365125, 10515600, 1325563),
            at(ph(Some("body"), 1, "Text Placeholder 2"), 839788, 1681163, 5157787, 823912),
            at(sized(ph(None, 2, "Content Placeholder 3"), "half"), 839788, 2505075, 5157787, 3684588),
            at(sized(ph(Some("body"), 3, "Text Placeholder 4"), "quarter"), 6172200, 1681163, 5183188, 823912),
            at(sized(ph(None, 4, "Content Placeholder 5"), "quarter"), 6172200, 2505075, 5183188, 3684588),
        ],
    },
    LayoutDef {
        name: "Title Only",
        layout_type: "titleOnly",
        placeholders: &[TITLE],
    },
    LayoutDef {
        name: "Blank",
        layout_type: "blank",
        placeholders: &[],
    },
    LayoutDef {
        name: "Content with Caption",
        layout_type: "objTx",
        placeholders: &[
            at(TITLE, 839788, 457200, 3932237, 1600200),
            at(ph(None, 1, "Content Placeholder 2"), 5183188, 987425, 6172200, 4873625),
            at(sized(ph(Some("body"), 2, "Text Placeholder 3"), "half"), 839788, 2057400, 3932237, 3811588),
        ],
    },
    LayoutDef {
        name: "Picture with Caption",
        layout_type: "picTx",
        placeholders: &[
            at(TITLE, 839788, 457200, 3932237, 1600200),
            at(ph(Some("pic"), 1, "Picture Placeholder 2"), 5183188, 987425, 6172200, 4873625),
            at(sized(ph(Some("body"), 2, "Text Placeholder 3"), "half"), 839788, 2057400, 3932237, 3811588),
        ],
    },
    LayoutDef {
        name: "Title and Vertical Text",
        layout_type: "vertTx",
        placeholders: &[TITLE, vertical(ph(Some("body"), 1, "Vertical Text Placeholder 2"))],
    },
    LayoutDef {
        name: "Vertical Title and Text",
        layout_type: "vertTitleAndTx",
        placeholders: &[
            at(vertical(TITLE), 8724900, 365125, 2628900, 5811838),
            at(vertical(ph(Some("body"), 1, "Vertical Text Placeholder 2")), 838200, 365125, 7734300, 5811838),
        ],
    },
];

/// Date, footer and slide number placeholders present on every layout.
const CHROME: [PlaceholderDef; 3] = [
    sized(ph(Some("dt"), 10, "Date Placeholder"), "half"),
    sized(ph(Some("ftr"), 11, "Footer Placeholder"), "quarter"),
    sized(ph(Some("sldNum"), 12, "Slide Number Placeholder"), "quarter"),
];

/// Generate the XML of a built-in layout.
pub fn slide_layout_xml(def: &LayoutDef) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="{}" preserve="1">"#,
        def.layout_type
    )?;
    write!(xml, r#"<p:cSld name="{}"><p:spTree>"#, def.name)?;
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    for (n, placeholder) in def.placeholders.iter().chain(CHROME.iter()).enumerate() {
        let shape_id = n as u32 + 2;
        xml.push_str("<p:sp><p:nvSpPr>");
        if def.placeholders.len() <= n {
            // Chrome names carry their position like PowerPoint does.
            write!(
                xml,
                r#"<p:cNvPr id="{}" name="{} {}"/>"#,
                shape_id,
                placeholder.name,
                shape_id - 1
            )?;
        } else {
            write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, shape_id, placeholder.name)?;
        }
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>"#);
        PlaceholderAttrs {
            type_code: placeholder.type_code.map(str::to_string),
            idx: placeholder.idx,
            orient: placeholder.orient.map(str::to_string),
            size: placeholder.size.map(str::to_string),
        }
        .write_xml(&mut xml);
        xml.push_str("</p:nvPr></p:nvSpPr>");
        match placeholder.geometry {
            Some(geometry) => {
                xml.push_str("<p:spPr>");
                geometry.write_xfrm(&mut xml, "a:xfrm")?;
                xml.push_str("</p:spPr>");
            },
            None => xml.push_str("<p:spPr/>"),
        }
        let body_pr = if placeholder.orient.is_some() {
            r#"<a:bodyPr vert="eaVert"/>"#
        } else {
            "<a:bodyPr/>"
        };
        write!(
            xml,
            r#"<p:txBody>{}<a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
            body_pr
        )?;
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

/// Notes master XML, added on demand when a slide first gets notes.
pub fn default_notes_master_xml() -> &'static str {
    NOTES_MASTER_XML
}

/// Office theme XML.
pub fn default_theme_xml() -> &'static str {
    THEME_XML
}

fn uri(s: &str) -> Result<PackURI> {
    Ok(PackURI::new(s).map_err(OpcError::InvalidPackUri)?)
}

fn xml_part(partname: &PackURI, content_type: &str, xml: &str) -> XmlPart {
    XmlPart::new(partname.clone(), content_type, xml.as_bytes().to_vec())
}

/// Build the blank package.
pub fn default_package() -> Result<OpcPackage> {
    let mut package = OpcPackage::new();

    let pres_uri = uri("/ppt/presentation.xml")?;
    let master_uri = uri("/ppt/slideMasters/slideMaster1.xml")?;
    let theme_uri = uri("/ppt/theme/theme1.xml")?;
    let pres_props_uri = uri("/ppt/presProps.xml")?;
    let view_props_uri = uri("/ppt/viewProps.xml")?;
    let table_styles_uri = uri("/ppt/tableStyles.xml")?;
    let core_uri = uri("/docProps/core.xml")?;
    let app_uri = uri("/docProps/app.xml")?;

    let mut master = xml_part(&master_uri, CT::PML_SLIDE_MASTER, SLIDE_MASTER_XML);
    for (n, def) in DEFAULT_LAYOUTS.iter().enumerate() {
        let layout_uri = uri(&format!("/ppt/slideLayouts/slideLayout{}.xml", n + 1))?;
        let mut layout = XmlPart::new(
            layout_uri.clone(),
            CT::PML_SLIDE_LAYOUT,
            slide_layout_xml(def)?.into_bytes(),
        );
        layout.relate_to(&master_uri, RT::SLIDE_MASTER);
        // rId1..rId11 match the master's sldLayoutIdLst.
        master.relate_to(&layout_uri, RT::SLIDE_LAYOUT);
        package.add_part(Box::new(layout));
    }
    master.relate_to(&theme_uri, RT::THEME);
    package.add_part(Box::new(master));

    let mut pres = xml_part(&pres_uri, CT::PML_PRESENTATION_MAIN, PRESENTATION_XML);
    pres.relate_to(&master_uri, RT::SLIDE_MASTER);
    pres.relate_to(&pres_props_uri, RT::PRES_PROPS);
    pres.relate_to(&view_props_uri, RT::VIEW_PROPS);
    pres.relate_to(&theme_uri, RT::THEME);
    pres.relate_to(&table_styles_uri, RT::TABLE_STYLES);
    package.add_part(Box::new(pres));

    package.add_part(Box::new(xml_part(&theme_uri, CT::OFC_THEME, THEME_XML)));
    package.add_part(Box::new(xml_part(&pres_props_uri, CT::PML_PRES_PROPS, PRES_PROPS_XML)));
    package.add_part(Box::new(xml_part(&view_props_uri, CT::PML_VIEW_PROPS, VIEW_PROPS_XML)));
    package.add_part(Box::new(xml_part(
        &table_styles_uri,
        CT::PML_TABLE_STYLES,
        TABLE_STYLES_XML,
    )));
    package.add_part(Box::new(xml_part(&core_uri, CT::OPC_CORE_PROPERTIES, CORE_XML)));
    package.add_part(Box::new(xml_part(&app_uri, CT::OFC_EXTENDED_PROPERTIES, APP_XML)));

    package.relate_to(&pres_uri, RT::OFFICE_DOCUMENT);
    package.relate_to(&core_uri, RT::CORE_PROPERTIES);
    package.relate_to(&app_uri, RT::EXTENDED_PROPERTIES);

    Ok(package)
}
