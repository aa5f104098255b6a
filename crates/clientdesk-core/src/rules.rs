/// Client record rules. Single source of truth for the MCP instructions and `get_rules`.
pub const RULES: &str = "\
1. Derived credentials are suggestions. Changing a source field rewrites its derived fields \
unconditionally, even if they were edited by hand. Editing a derived field never triggers anything.\n\
2. PAN change: it_portal_user_id := PAN. If date_of_incorporation_birth is set, \
password_ais_tis := lowercase(PAN) + DD + MM + YYYY.\n\
3. TAN change: it_portal_user_id_tds := TAN.\n\
4. Date of incorporation/birth change (non-empty, YYYY-MM-DD): password_26as := DDMMYYYY and \
password_ais_tis := lowercase(current PAN, or empty) + DDMMYYYY. An empty date touches nothing.\n\
5. A date with the wrong number of segments is not rejected: missing parts are treated as empty \
and the suggestion is built from what is there.\n\
6. Only the field that changed selects a rule. Rules never chain.\n\
7. Every constitution shows Overview, Credentials, GST, Bank Accounts, EPF / ESI and Other \
Registrations. Individual adds KYC / DSC. Company adds Directors and Shareholders. LLP and \
Partnership Firm add Partners. HUF, Trust, AOP, BOI and any unrecognized value get nothing more.\n\
8. Section visibility depends on the constitution alone and is advisory. Do not create directors, \
shareholders or partners for a client whose constitution does not show that section.\n\
9. Password fields (MCA, DSC token, IT portal, IT TDS, 26AS, AIS/TIS, TRACES deductor and taxpayer) \
are secrets. Use redact_client before showing a record to anyone.";
