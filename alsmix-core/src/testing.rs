use crate::document::Document;

pub(crate) const SAMPLE_SET: &str = include_str!("../tests/fixtures/sample_set.xml");

pub(crate) fn sample_doc() -> Document {
    Document::from_xml(SAMPLE_SET).expect("fixture parses")
}

/// Minimal document with one audio track and the given master bus element name.
pub(crate) fn minimal_doc(master_tag: &str) -> Document {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Ableton Creator="Ableton Live 9.7.7">
	<LiveSet>
		<Tracks>
			<AudioTrack Id="1">
				<Name><EffectiveName Value="Solo" /></Name>
				<DeviceChain>
					<Mixer>
						<Volume><Manual Value="1" /></Volume>
						<Pan><Manual Value="0" /></Pan>
					</Mixer>
				</DeviceChain>
			</AudioTrack>
		</Tracks>
		<{tag}>
			<DeviceChain>
				<Mixer>
					<Volume Value="0.5" />
				</Mixer>
			</DeviceChain>
		</{tag}>
	</LiveSet>
</Ableton>
"#,
        tag = master_tag
    );
    Document::from_xml(&xml).expect("minimal document parses")
}
