//! Chart XML writer.
//!
//! Produces standalone `c:chartSpace` parts whose data is carried inline as
//! literals, so no embedded workbook is needed.

use crate::common::xml::escape_xml;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Native chart type category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Clustered column chart
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    fn legend_position(self) -> &'static str {
        match self {
            Self::Bar | Self::Line => "b",
            Self::Pie => "r",
        }
    }
}

/// One named data series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Data for a single-plot chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Serialize to a complete chart part.
    pub fn to_xml(&self) -> std::io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(2048);
        write_chart(&mut out, self)?;
        Ok(out)
    }
}

/// Write a chart to XML.
pub fn write_chart<W: Write>(writer: &mut W, chart: &ChartData) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#
    )?;
    write!(
        writer,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#
    )?;
    write!(
        writer,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    )?;
    write!(writer, r#"<c:date1904 val="0"/>"#)?;
    write!(writer, r#"<c:lang val="en-US"/>"#)?;
    write!(writer, r#"<c:roundedCorners val="0"/>"#)?;

    write!(writer, "<c:chart>")?;
    write!(writer, r#"<c:autoTitleDeleted val="1"/>"#)?;

    write!(writer, "<c:plotArea><c:layout/>")?;
    match chart.kind {
        ChartKind::Bar => write_bar_chart(writer, chart)?,
        ChartKind::Line => write_line_chart(writer, chart)?,
        ChartKind::Pie => write_pie_chart(writer, chart)?,
    }
    if chart.kind != ChartKind::Pie {
        write_category_axis(writer)?;
        write_value_axis(writer)?;
    }
    write!(writer, "</c:plotArea>")?;

    write!(writer, "<c:legend>")?;
    write!(
        writer,
        r#"<c:legendPos val="{}"/>"#,
        chart.kind.legend_position()
    )?;
    write!(writer, r#"<c:overlay val="0"/>"#)?;
    write!(writer, "</c:legend>")?;

    write!(writer, r#"<c:plotVisOnly val="1"/>"#)?;
    write!(writer, r#"<c:dispBlanksAs val="gap"/>"#)?;
    write!(writer, "</c:chart>")?;

    write!(writer, "<c:txPr><a:bodyPr/><a:lstStyle/>")?;
    write!(writer, r#"<a:p><a:pPr><a:defRPr sz="1800"/></a:pPr><a:endParaRPr lang="en-US"/></a:p>"#)?;
    write!(writer, "</c:txPr>")?;

    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_bar_chart<W: Write>(writer: &mut W, chart: &ChartData) -> std::io::Result<()> {
    write!(writer, "<c:barChart>")?;
    write!(writer, r#"<c:barDir val="col"/>"#)?;
    write!(writer, r#"<c:grouping val="clustered"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, idx, series, &chart.categories)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:gapWidth val="150"/>"#)?;
    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:barChart>")?;

    Ok(())
}

fn write_line_chart<W: Write>(writer: &mut W, chart: &ChartData) -> std::io::Result<()> {
    write!(writer, "<c:lineChart>")?;
    write!(writer, r#"<c:grouping val="standard"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, idx, series, &chart.categories)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:marker val="1"/>"#)?;
    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:lineChart>")?;

    Ok(())
}

/// A pie plots a single series; any others are ignored here.
fn write_pie_chart<W: Write>(writer: &mut W, chart: &ChartData) -> std::io::Result<()> {
    write!(writer, "<c:pieChart>")?;
    write!(writer, r#"<c:varyColors val="1"/>"#)?;

    if let Some(series) = chart.series.first() {
        write_series(writer, 0, series, &chart.categories)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:firstSliceAng val="0"/>"#)?;
    write!(writer, "</c:pieChart>")?;

    Ok(())
}

fn write_series<W: Write>(
    writer: &mut W,
    idx: usize,
    series: &ChartSeries,
    categories: &[String],
) -> std::io::Result<()> {
    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{}"/>"#, idx)?;
    write!(writer, r#"<c:order val="{}"/>"#, idx)?;
    write!(
        writer,
        "<c:tx><c:v>{}</c:v></c:tx>",
        escape_xml(&series.name)
    )?;

    write!(writer, "<c:cat><c:strLit>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, categories.len())?;
    for (i, val) in categories.iter().enumerate() {
        write!(
            writer,
            r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
            i,
            escape_xml(val)
        )?;
    }
    write!(writer, "</c:strLit></c:cat>")?;

    write!(writer, "<c:val><c:numLit>")?;
    write!(writer, "<c:formatCode>General</c:formatCode>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, series.values.len())?;
    let mut fmt = ryu::Buffer::new();
    for (i, val) in series.values.iter().enumerate() {
        // Non-finite values have no XML representation; leave the point out.
        if !val.is_finite() {
            continue;
        }
        write!(
            writer,
            r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
            i,
            format_number(&mut fmt, *val)
        )?;
    }
    write!(writer, "</c:numLit></c:val>")?;

    write!(writer, "</c:ser>")?;

    Ok(())
}

/// Shortest round-tripping representation, without a trailing `.0`.
fn format_number(buf: &mut ryu::Buffer, value: f64) -> &str {
    let s = buf.format_finite(value);
    s.strip_suffix(".0").unwrap_or(s)
}

fn write_data_labels_default<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(writer, "<c:dLbls>")?;
    write!(writer, r#"<c:showLegendKey val="0"/>"#)?;
    write!(writer, r#"<c:showVal val="0"/>"#)?;
    write!(writer, r#"<c:showCatName val="0"/>"#)?;
    write!(writer, r#"<c:showSerName val="0"/>"#)?;
    write!(writer, r#"<c:showPercent val="0"/>"#)?;
    write!(writer, r#"<c:showBubbleSize val="0"/>"#)?;
    write!(writer, "</c:dLbls>")?;
    Ok(())
}

fn write_category_axis<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(writer, "<c:catAx>")?;
    write!(writer, r#"<c:axId val="1"/>"#)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/>"#)?;
    write!(writer, r#"<c:axPos val="b"/>"#)?;
    write!(writer, r#"<c:majorTickMark val="out"/>"#)?;
    write!(writer, r#"<c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="2"/>"#)?;
    write!(writer, r#"<c:crosses val="autoZero"/>"#)?;
    write!(writer, r#"<c:auto val="1"/>"#)?;
    write!(writer, r#"<c:lblAlgn val="ctr"/>"#)?;
    write!(writer, r#"<c:lblOffset val="100"/>"#)?;
    write!(writer, r#"<c:noMultiLvlLbl val="0"/>"#)?;
    write!(writer, "</c:catAx>")?;
    Ok(())
}

fn write_value_axis<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(writer, "<c:valAx>")?;
    write!(writer, r#"<c:axId val="2"/>"#)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/>"#)?;
    write!(writer, r#"<c:axPos val="l"/>"#)?;
    write!(writer, "<c:majorGridlines/>")?;
    write!(writer, r#"<c:numFmt formatCode="General" sourceLinked="1"/>"#)?;
    write!(writer, r#"<c:majorTickMark val="out"/>"#)?;
    write!(writer, r#"<c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="1"/>"#)?;
    write!(writer, r#"<c:crosses val="autoZero"/>"#)?;
    write!(writer, r#"<c:crossBetween val="between"/>"#)?;
    write!(writer, "</c:valAx>")?;
    Ok(())
}
