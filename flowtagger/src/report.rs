use std::io::{self, Write};

use crate::{args::ReportOrder, classifier::Tallies, tally::Tally};

pub const TAG_SECTION: &str = "Tag Counts:";
pub const TAG_HEADER: &str = "Tag,Count";
pub const PORT_PROTOCOL_SECTION: &str = "Port/Protocol Combination Counts:";
pub const PORT_PROTOCOL_HEADER: &str = "Port,Protocol,Count";

fn section<'a>(
    title: &'static str,
    header: &'static str,
    tally: &'a Tally,
    order: ReportOrder,
) -> impl Iterator<Item = String> + 'a {
    [title.to_string(), header.to_string()].into_iter().chain(
        tally
            .ordered(order)
            .into_iter()
            .map(|(label, count)| format!("{},{}", label, count)),
    )
}

/// The report, one line per item and without line terminators.
///
/// Tag counts come first, then a blank line, then the port/protocol counts.
/// Port/protocol rows read `<port>,<protocol>,<count>`.
pub fn report_lines<'a>(
    tallies: &'a Tallies,
    order: ReportOrder,
) -> impl Iterator<Item = String> + 'a {
    section(TAG_SECTION, TAG_HEADER, &tallies.tags, order)
        .chain(std::iter::once(String::new()))
        .chain(section(
            PORT_PROTOCOL_SECTION,
            PORT_PROTOCOL_HEADER,
            &tallies.port_protocol,
            order,
        ))
}

/// Writes the report line by line, stopping at the first failed write.
pub fn write_report<W: Write>(
    writer: &mut W,
    tallies: &Tallies,
    order: ReportOrder,
) -> io::Result<()> {
    for line in report_lines(tallies, order) {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}
